//! Game session and the title/playing/game-over state machine.

use crate::config::{Config, ConfigError};
use crate::paddle::{Controller, PaddleController};
use crate::physics::Physics;
use crate::timing::FrameClock;
use crate::types::*;
use crate::vector::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::Instant;

/// Main game state and logic
pub struct Game {
    pub config: Config,
    /// Ticks simulated since the session started
    pub tick: Tick,
    pub state: MatchState,
    /// `[left, right]`
    pub paddles: [Entity; 2],
    pub ball: Entity,
    pub score: [u8; 2],
    /// Left paddle human-controlled
    pub two_player: bool,
    rng: Pcg32,
    clock: FrameClock,
    /// Edge-triggered buttons seen since the last simulated tick
    pending_buttons: u8,
}

impl Game {
    /// Create a new game with the given configuration
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut game = Game {
            config,
            tick: 0,
            state: MatchState::Title,
            paddles: [
                Entity::at_rest(config.paddle_home(Side::Left), config.paddle_size),
                Entity::at_rest(config.paddle_home(Side::Right), config.paddle_size),
            ],
            ball: Entity::at_rest(config.ball_home(), config.ball_size),
            score: [0, 0],
            two_player: config.two_player,
            rng: Pcg32::seed_from_u64(config.seed),
            clock: FrameClock::from_config(&config),
            pending_buttons: 0,
        };

        game.reset_layout();
        log::info!(
            "new {} session on a {}x{} field",
            if game.two_player { "two-player" } else { "single-player" },
            config.screen.width(),
            config.screen.height()
        );
        Ok(game)
    }

    /// Step the game simulation forward by one tick
    pub fn step(&mut self, input: &Input) -> Option<Event> {
        let event = match self.state {
            MatchState::Title => {
                if input.is_start() {
                    self.reset_match();
                    None
                } else {
                    self.simulate(input)
                }
            }

            MatchState::Playing => self.simulate(input),

            MatchState::GameOver(_) => {
                // Frozen until restart
                if input.is_restart() {
                    self.reset_match();
                }
                None
            }
        };

        self.tick = self.tick.wrapping_add(1);
        event
    }

    /// Run however many ticks the wall clock owes at `now`.
    ///
    /// Start/restart presses are remembered until a tick actually runs, so a
    /// press landing on a frame with no tick is not lost.
    pub fn frame(&mut self, now: Instant, input: &Input) -> Vec<Event> {
        self.pending_buttons |= input.buttons & (BUTTON_START | BUTTON_RESTART);

        let ticks = self.clock.advance(now);
        let mut events = Vec::new();

        for _ in 0..ticks {
            let tick_input = Input {
                buttons: (input.buttons & BUTTON_QUIT) | self.pending_buttons,
                ..*input
            };
            self.pending_buttons = 0;

            if let Some(event) = self.step(&tick_input) {
                events.push(event);
            }
        }

        events
    }

    /// Which law drives `side` in the current state
    pub fn controller(&self, side: Side) -> Controller {
        match (self.state, side) {
            (MatchState::Title, _) => Controller::Ai,
            (_, Side::Left) if !self.two_player => Controller::Ai,
            _ => Controller::Human,
        }
    }

    /// Reset scores and layout and start playing (rematch)
    pub fn reset_match(&mut self) {
        self.score = [0, 0];
        self.reset_layout();

        let previous = self.state;
        self.state = MatchState::Playing;
        log::info!("{previous:?} -> Playing");
    }

    /// Adopt a new playfield size, keeping every entity inside it
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let config = Config {
            screen: Vec2::new(width, height),
            ..self.config
        };
        config.validate()?;
        self.config = config;

        for side in Side::BOTH {
            let paddle = &mut self.paddles[side.index()];
            paddle.pos.x = config.paddle_home(side).x;
            PaddleController::clamp(paddle, &config);
        }

        let max_ball = config.screen - self.ball.size;
        self.ball.pos.x = self.ball.pos.x.clamp(0.0, max_ball.x);
        self.ball.pos.y = self.ball.pos.y.clamp(0.0, max_ball.y);

        log::debug!("resized field to {width}x{height}");
        Ok(())
    }

    /// Forget frame timing, so the next `frame` only restarts the clock.
    /// Drivers call this after a pause instead of replaying the gap.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
        self.pending_buttons = 0;
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            tick: self.tick,
            state: self.state,
            screen: self.config.screen,
            ball: self.ball,
            paddles: self.paddles,
            score: self.score,
            two_player: self.two_player,
        }
    }

    /// Get the current winner (if game is over)
    pub fn winner(&self) -> Option<Side> {
        match self.state {
            MatchState::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    /// Check if a match is in progress
    pub fn is_active(&self) -> bool {
        matches!(self.state, MatchState::Playing)
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self.state {
            MatchState::Title => "Press SPACE to start",
            MatchState::Playing => "Playing",
            MatchState::GameOver(_) => "Game over, press R to restart",
        }
    }

    /// Paddles, ball and collisions for one tick
    fn simulate(&mut self, input: &Input) -> Option<Event> {
        for side in Side::BOTH {
            let controller = self.controller(side);
            let paddle = &mut self.paddles[side.index()];
            match controller {
                Controller::Human => {
                    PaddleController::drive(paddle, &input.keys(side), &self.config)
                }
                Controller::Ai => PaddleController::track(paddle, side, &self.ball, &self.config),
            }
        }

        Physics::integrate(&mut self.ball);
        Physics::bounce_walls(&mut self.ball, &self.config);
        let hit = Physics::resolve_paddle_hit(&mut self.ball, &self.paddles, &self.config);

        match Physics::check_scoring(&self.ball, &self.config) {
            Some(scorer) => self.handle_score(scorer),
            None => hit.map(Event::PaddleHit),
        }
    }

    /// Handle a ball leaving the field
    fn handle_score(&mut self, scorer: Side) -> Option<Event> {
        // Next rally heads toward the scorer
        self.home_paddles();
        Physics::serve_ball(&mut self.ball, scorer, &self.config, &mut self.rng);

        if self.state == MatchState::Title {
            return None;
        }

        let slot = &mut self.score[scorer.index()];
        *slot = slot.saturating_add(1).min(self.config.win_score);
        log::debug!(
            "{scorer:?} scored, {} - {}",
            self.score[0],
            self.score[1]
        );

        match winner_for(self.score, self.config.win_score) {
            Some(winner) => {
                self.state = MatchState::GameOver(winner);
                log::info!("Playing -> GameOver, {winner:?} wins {:?}", self.score);
                Some(Event::MatchWon {
                    winner,
                    score: self.score,
                })
            }
            None => Some(Event::Scored {
                scorer,
                score: self.score,
            }),
        }
    }

    /// Paddles home, ball served in a random direction
    fn reset_layout(&mut self) {
        self.home_paddles();
        Physics::serve_random(&mut self.ball, &self.config, &mut self.rng);
    }

    fn home_paddles(&mut self) {
        for side in Side::BOTH {
            self.paddles[side.index()] =
                Entity::at_rest(self.config.paddle_home(side), self.config.paddle_size);
        }
    }
}

/// Left is checked first, so it wins a simultaneous finish
fn winner_for(score: [u8; 2], win_score: u8) -> Option<Side> {
    Side::BOTH
        .into_iter()
        .find(|side| score[side.index()] >= win_score)
}
