//! Paddle movement: keyboard-driven and the reflex AI.

use crate::config::Config;
use crate::types::{Entity, PaddleKeys, Side};

/// Which law drives a paddle this tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Controller {
    Human,
    Ai,
}

/// Paddle controller laws
pub struct PaddleController;

impl PaddleController {
    /// Move a paddle from its up/down keys
    pub fn drive(paddle: &mut Entity, keys: &PaddleKeys, config: &Config) {
        paddle.pos.y += keys.axis() * config.paddle_step;
        Self::clamp(paddle, config);
    }

    /// Reflex AI. Chases the ball while it approaches, drifts back to centre otherwise.
    ///
    /// The chase speed grows with the ball's speed and the paddle may overshoot,
    /// which keeps the AI beatable.
    pub fn track(paddle: &mut Entity, side: Side, ball: &Entity, config: &Config) {
        let paddle_center = paddle.center().y;

        if side.is_approached_by(ball.vel.x) {
            let ball_center = ball.center().y;
            let speed = if ball.vel.y != 0.0 {
                ball.vel.y.abs() + config.ai_horizontal_factor * ball.vel.x.abs()
            } else {
                config.paddle_step
            };

            if ball_center < paddle_center {
                paddle.pos.y -= speed;
            } else if ball_center > paddle_center {
                paddle.pos.y += speed;
            }
        } else {
            let screen_center = config.screen.height() * 0.5;

            // Resting inside the dead zone stops the paddle jittering around centre
            if paddle_center < screen_center - config.ai_dead_zone {
                paddle.pos.y += config.paddle_step;
            } else if paddle_center > screen_center + config.ai_dead_zone {
                paddle.pos.y -= config.paddle_step;
            }
        }

        Self::clamp(paddle, config);
    }

    /// Keep the paddle on screen
    pub fn clamp(paddle: &mut Entity, config: &Config) {
        let y = if paddle.pos.y.is_finite() {
            paddle.pos.y
        } else {
            0.0
        };
        paddle.pos.y = y.clamp(0.0, config.paddle_max_y());
    }
}
