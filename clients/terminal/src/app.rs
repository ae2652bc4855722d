use crate::event::{AppEvent, Event, EventHandler};
use pong_core::{
    Config, Event as GameEvent, Game, Input, PaddleKeys, Side, BUTTON_QUIT, BUTTON_RESTART,
    BUTTON_START,
};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::Rect,
    DefaultTerminal,
};
use std::time::{Duration, Instant};

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameKey {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
    Start,
    Restart,
    Quit,
}

fn map_keycode_to_game_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(GameKey::LeftUp),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(GameKey::LeftDown),
        KeyCode::Up => Some(GameKey::RightUp),
        KeyCode::Down => Some(GameKey::RightDown),
        KeyCode::Char(' ') => Some(GameKey::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameKey::Restart),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(GameKey::Quit),
        _ => None,
    }
}

/// Common trait for one paddle's key state
trait PlayerInput {
    fn handle_up(&mut self, pressed: bool);
    fn handle_down(&mut self, pressed: bool);
    fn to_keys(&self) -> PaddleKeys;
    fn reset(&mut self);
    fn update(&mut self) {} // Default no-op, overridden by latched input
}

/// Hold-to-move input for terminals that report key releases
#[derive(Default)]
struct EnhancedPlayerInput {
    up_held: bool,
    down_held: bool,
}

impl PlayerInput for EnhancedPlayerInput {
    fn handle_up(&mut self, pressed: bool) {
        self.up_held = pressed;
    }
    fn handle_down(&mut self, pressed: bool) {
        self.down_held = pressed;
    }

    fn to_keys(&self) -> PaddleKeys {
        PaddleKeys::new(self.up_held, self.down_held)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ticks a key stays down after a press when no release events arrive.
/// Covers the gap before the terminal's key repeat kicks in.
const LATCH_TICKS: u8 = 8;

/// Tap-to-move input for terminals without release events. Each press (and
/// each auto-repeat) holds the direction for a few ticks.
#[derive(Default)]
struct LatchedPlayerInput {
    up_ticks: u8,
    down_ticks: u8,
}

impl PlayerInput for LatchedPlayerInput {
    fn handle_up(&mut self, pressed: bool) {
        if pressed {
            self.up_ticks = LATCH_TICKS;
            self.down_ticks = 0;
        }
    }

    fn handle_down(&mut self, pressed: bool) {
        if pressed {
            self.down_ticks = LATCH_TICKS;
            self.up_ticks = 0;
        }
    }

    fn to_keys(&self) -> PaddleKeys {
        PaddleKeys::new(self.up_ticks > 0, self.down_ticks > 0)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self) {
        self.up_ticks = self.up_ticks.saturating_sub(1);
        self.down_ticks = self.down_ticks.saturating_sub(1);
    }
}

/// Keyboard state for both paddles plus the one-shot buttons
pub struct InputSystem {
    left: Box<dyn PlayerInput>,
    right: Box<dyn PlayerInput>,
    buttons: u8,
    is_enhanced: bool,
}

impl InputSystem {
    fn new(is_enhanced: bool) -> Self {
        let player = || -> Box<dyn PlayerInput> {
            if is_enhanced {
                Box::new(EnhancedPlayerInput::default())
            } else {
                Box::new(LatchedPlayerInput::default())
            }
        };

        Self {
            left: player(),
            right: player(),
            buttons: 0,
            is_enhanced,
        }
    }

    pub fn mode_description(&self) -> &'static str {
        if self.is_enhanced {
            "Hold keys"
        } else {
            "Tap keys"
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent) {
        let Some(game_key) = map_keycode_to_game_key(event.code) else {
            return;
        };
        // Repeats count as presses so latched input keeps moving
        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);

        match game_key {
            GameKey::LeftUp => self.left.handle_up(pressed),
            GameKey::LeftDown => self.left.handle_down(pressed),
            GameKey::RightUp => self.right.handle_up(pressed),
            GameKey::RightDown => self.right.handle_down(pressed),
            GameKey::Start if pressed => self.buttons |= BUTTON_START,
            GameKey::Restart if pressed => self.buttons |= BUTTON_RESTART,
            GameKey::Quit if pressed => self.buttons |= BUTTON_QUIT,
            _ => {}
        }
    }

    /// Snapshot for this frame. One-shot buttons are consumed.
    fn take_input(&mut self) -> Input {
        let input = Input::new(self.left.to_keys(), self.right.to_keys(), self.buttons);
        self.buttons = 0;
        input
    }

    fn update(&mut self) {
        self.left.update();
        self.right.update();
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.buttons = 0;
    }
}

/// Frames-per-second readout, refreshed once a second
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    timer: Duration,
    fps: u32,
}

impl FpsCounter {
    fn record(&mut self, delta: Duration) {
        self.frames += 1;
        self.timer += delta;
        if self.timer >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.timer -= Duration::from_secs(1);
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Game board size constants
pub const MIN_GAME_WIDTH: u16 = 40;
pub const MIN_GAME_HEIGHT: u16 = 16;
const FIXED_GAME_WIDTH: u16 = 80;
const FIXED_GAME_HEIGHT: u16 = 24;

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Game session
    pub game: Game,
    pub input_system: InputSystem,
    /// Field fills the terminal instead of a fixed centred box
    pub fullscreen: bool,
    pub fps: FpsCounter,
    /// Most recent point, for the header
    pub last_point: Option<Side>,
    pub events: EventHandler,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether the UI is paused due to a small terminal
    pub ui_paused: bool,
    last_frame: Instant,
}

impl App {
    /// Constructs a new instance of App
    pub fn new(config: Config, fullscreen: bool) -> color_eyre::Result<Self> {
        let game = Game::new(config)?;
        let events = EventHandler::new()?;
        let input_system = InputSystem::new(events.keyboard_enhanced());
        log::info!("input mode: {}", input_system.mode_description());

        let (width, height) = ratatui::crossterm::terminal::size()?;
        let mut app = Self {
            running: true,
            game,
            input_system,
            fullscreen,
            fps: FpsCounter::default(),
            last_point: None,
            events,
            terminal_size: (width, height),
            ui_paused: false,
            last_frame: Instant::now(),
        };
        app.handle_resize(width, height);
        Ok(app)
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Tick(now) => self.tick(now),
            Event::Crossterm(event) => {
                if let ratatui::crossterm::event::Event::Key(key_event) = event {
                    self.handle_key_event(key_event);
                }
            }
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Ok(())
    }

    /// Handle key events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        self.input_system.handle_key_event(key_event);
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::TerminalResize(width, height) => self.handle_resize(width, height),
        }
    }

    /// Advance the game by however many ticks have elapsed
    fn tick(&mut self, now: Instant) {
        self.fps.record(now.saturating_duration_since(self.last_frame));
        self.last_frame = now;

        let input = self.input_system.take_input();
        if input.is_quit() {
            self.quit();
            return;
        }

        if self.ui_paused {
            return;
        }

        let previous = self.game.state;
        for event in self.game.frame(now, &input) {
            match event {
                GameEvent::Scored { scorer, .. } | GameEvent::MatchWon { winner: scorer, .. } => {
                    self.last_point = Some(scorer)
                }
                GameEvent::PaddleHit(_) => {}
            }
        }

        if previous != self.game.state {
            // Keys held across a state change shouldn't leak into the new one
            self.input_system.reset();
            self.last_point = None;
        }

        self.input_system.update();
    }

    fn quit(&mut self) {
        log::info!("quitting after {} ticks", self.game.tick);
        self.running = false;
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);

        let paused = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
        if paused != self.ui_paused {
            log::debug!("terminal {width}x{height}, paused: {paused}");
        }
        if self.ui_paused && !paused {
            // Resume where we left off rather than catching up on the pause
            self.game.reset_clock();
        }
        self.ui_paused = paused;
    }

    /// Area the game occupies: the whole terminal in fullscreen mode,
    /// otherwise a fixed-size box centred in it
    pub fn calculate_game_area(&self, area: Rect) -> Option<Rect> {
        if self.ui_paused {
            return None; // Too small
        }
        if self.fullscreen {
            return Some(area);
        }

        let game_width = FIXED_GAME_WIDTH.min(area.width);
        let game_height = FIXED_GAME_HEIGHT.min(area.height);

        let x_offset = area.width.saturating_sub(game_width) / 2;
        let y_offset = area.height.saturating_sub(game_height) / 2;

        Some(Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: game_width,
            height: game_height,
        })
    }

    /// Player name for a side, as shown on the game-over screen
    pub fn player_name(&self, side: Side) -> &'static str {
        match (side, self.game.two_player) {
            (Side::Left, true) => "Player 1",
            (Side::Right, true) => "Player 2",
            (Side::Left, false) => "Computer",
            (Side::Right, false) => "You",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_keycode_to_game_key(KeyCode::Char('W')), Some(GameKey::LeftUp));
        assert_eq!(map_keycode_to_game_key(KeyCode::Down), Some(GameKey::RightDown));
        assert_eq!(map_keycode_to_game_key(KeyCode::Esc), Some(GameKey::Quit));
        assert_eq!(map_keycode_to_game_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_enhanced_input_holds_until_release() {
        let mut input = InputSystem::new(true);

        input.handle_key_event(key(KeyCode::Up, KeyEventKind::Press));
        for _ in 0..20 {
            input.update();
        }
        assert_eq!(input.take_input().right, PaddleKeys::up());

        input.handle_key_event(key(KeyCode::Up, KeyEventKind::Release));
        assert_eq!(input.take_input().right, PaddleKeys::default());
    }

    #[test]
    fn test_latched_input_expires() {
        let mut input = InputSystem::new(false);

        input.handle_key_event(key(KeyCode::Char('s'), KeyEventKind::Press));
        assert_eq!(input.take_input().left, PaddleKeys::down());

        for _ in 0..LATCH_TICKS {
            input.update();
        }
        assert_eq!(input.take_input().left, PaddleKeys::default());
    }

    #[test]
    fn test_latched_opposite_key_cancels() {
        let mut input = InputSystem::new(false);

        input.handle_key_event(key(KeyCode::Up, KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Down, KeyEventKind::Press));

        assert_eq!(input.take_input().right, PaddleKeys::down());
    }

    #[test]
    fn test_buttons_consumed_once() {
        let mut input = InputSystem::new(true);

        input.handle_key_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Char('r'), KeyEventKind::Release));

        let first = input.take_input();
        assert!(first.is_start());
        assert!(!first.is_restart());
        assert_eq!(input.take_input().buttons, 0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for _ in 0..60 {
            fps.record(Duration::from_millis(17));
        }
        assert_eq!(fps.fps(), 59);
    }
}
