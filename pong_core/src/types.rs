//! Core types shared by the simulation, the state machine and the drivers.

use crate::vector::Vec2;

/// Tick counter type
pub type Tick = u32;

/// Start button bit (Title -> Playing)
pub const BUTTON_START: u8 = 1 << 0;
/// Restart button bit (GameOver -> Playing)
pub const BUTTON_RESTART: u8 = 1 << 1;
/// Quit/escape bit, observed by the driver rather than the core
pub const BUTTON_QUIT: u8 = 1 << 2;

/// Player/paddle side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into `[left, right]` arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Whether a ball with horizontal velocity `vx` is travelling toward this side.
    /// A ball with no horizontal motion is heading toward neither side.
    pub fn is_approached_by(self, vx: f32) -> bool {
        match self {
            Side::Left => vx < 0.0,
            Side::Right => vx > 0.0,
        }
    }

    /// Sign of horizontal velocity that carries the ball toward this side
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Match state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchState {
    /// Attract mode: both paddles AI, score untouched
    Title,
    /// Active gameplay
    Playing,
    /// Match finished (winner)
    GameOver(Side),
}

/// Axis-aligned rectangle with a velocity. Used for the ball and both paddles.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per tick
    pub vel: Vec2,
}

impl Entity {
    pub fn new(pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Entity { pos, size, vel }
    }

    /// Entity at rest
    pub fn at_rest(pos: Vec2, size: Vec2) -> Self {
        Entity::new(pos, size, Vec2::zero())
    }

    pub fn min(&self) -> Vec2 {
        self.pos
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size.half()
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.width()
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.height()
    }
}

/// Up/down keys assigned to one paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PaddleKeys {
    pub up: bool,
    pub down: bool,
}

impl PaddleKeys {
    pub fn new(up: bool, down: bool) -> Self {
        PaddleKeys { up, down }
    }

    pub fn up() -> Self {
        PaddleKeys::new(true, false)
    }

    pub fn down() -> Self {
        PaddleKeys::new(false, true)
    }

    /// -1 for up, 1 for down, 0 when idle or both held
    pub fn axis(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Input snapshot for one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Input {
    pub left: PaddleKeys,
    pub right: PaddleKeys,
    /// Button bitfield (`BUTTON_*`)
    pub buttons: u8,
}

impl Input {
    pub fn new(left: PaddleKeys, right: PaddleKeys, buttons: u8) -> Self {
        Input {
            left,
            right,
            buttons,
        }
    }

    pub fn zero() -> Self {
        Input::default()
    }

    /// Input with only the given buttons pressed
    pub fn buttons(buttons: u8) -> Self {
        Input {
            buttons,
            ..Input::default()
        }
    }

    pub fn keys(&self, side: Side) -> PaddleKeys {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_start(&self) -> bool {
        (self.buttons & BUTTON_START) != 0
    }

    pub fn is_restart(&self) -> bool {
        (self.buttons & BUTTON_RESTART) != 0
    }

    pub fn is_quit(&self) -> bool {
        (self.buttons & BUTTON_QUIT) != 0
    }

    /// Same paddle keys with the edge-triggered buttons cleared
    pub fn held_keys(&self) -> Self {
        Input {
            buttons: self.buttons & BUTTON_QUIT,
            ..*self
        }
    }
}

/// View data for rendering
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct View {
    pub tick: Tick,
    pub state: MatchState,
    pub screen: Vec2,
    pub ball: Entity,
    /// `[left, right]`
    pub paddles: [Entity; 2],
    /// `[left, right]` scores
    pub score: [u8; 2],
    pub two_player: bool,
}

/// Game events that can occur during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// A point was scored and the rally restarts
    Scored {
        scorer: Side,
        score: [u8; 2], // New score after this point
    },
    /// The point that ended the match
    MatchWon { winner: Side, score: [u8; 2] },
    /// The ball came off a paddle
    PaddleHit(Side),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[test]
    fn test_side_approach() {
        assert!(Side::Left.is_approached_by(-1.0));
        assert!(!Side::Left.is_approached_by(1.0));
        assert!(Side::Right.is_approached_by(1.0));
        assert!(!Side::Right.is_approached_by(0.0));
        assert!(!Side::Left.is_approached_by(0.0));
    }

    #[test]
    fn test_input_buttons() {
        let input = Input::buttons(BUTTON_START | BUTTON_QUIT);

        assert!(input.is_start());
        assert!(!input.is_restart());
        assert!(input.is_quit());

        let held = input.held_keys();
        assert!(!held.is_start());
        assert!(held.is_quit());
    }

    #[test]
    fn test_paddle_keys_axis() {
        assert_eq!(PaddleKeys::up().axis(), -1.0);
        assert_eq!(PaddleKeys::down().axis(), 1.0);
        assert_eq!(PaddleKeys::new(true, true).axis(), 0.0);
        assert_eq!(PaddleKeys::default().axis(), 0.0);
    }

    #[test]
    fn test_input_keys_per_side() {
        let input = Input::new(PaddleKeys::up(), PaddleKeys::down(), 0);

        assert_eq!(input.keys(Side::Left), PaddleKeys::up());
        assert_eq!(input.keys(Side::Right), PaddleKeys::down());
    }

    #[test]
    fn test_entity_edges() {
        let paddle = Entity::at_rest(Vec2::new(20.0, 215.0), Vec2::new(10.0, 50.0));

        assert_eq!(paddle.right(), 30.0);
        assert_eq!(paddle.bottom(), 265.0);
        assert_eq!(paddle.center(), Vec2::new(25.0, 240.0));
        assert_eq!(paddle.max(), Vec2::new(30.0, 265.0));
    }
}
