//! Pong core game engine - fixed-step simulation, reflex AI and match state machine

pub mod collision;
pub mod config;
pub mod game;
pub mod paddle;
pub mod physics;
pub mod render;
pub mod timing;
pub mod types;
pub mod vector;

pub use collision::overlaps;
pub use config::{Config, ConfigError};
pub use game::Game;
pub use paddle::{Controller, PaddleController};
pub use physics::Physics;
pub use render::{CellRect, RenderHelper};
pub use timing::FrameClock;
pub use types::*;
pub use vector::Vec2;
