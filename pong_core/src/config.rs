//! Game configuration and validation.

use crate::types::Side;
use crate::vector::Vec2;
use std::time::Duration;
use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{entity} of {size:?} does not fit a {screen:?} screen")]
    DoesNotFit {
        entity: &'static str,
        size: Vec2,
        screen: Vec2,
    },
    #[error("paddles overlap horizontally: margin {margin} and width {width} on a screen {screen_width} wide")]
    PaddlesOverlap {
        margin: f32,
        width: f32,
        screen_width: f32,
    },
    #[error("serve vertical speed range is inverted: min {min} > max {max}")]
    InvertedServeRange { min: f32, max: f32 },
    #[error("max ball speed {max} is below the serve speed {serve}")]
    SpeedCapBelowServe { max: f32, serve: f32 },
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
}

/// Game configuration. Velocities and steps are in units per tick.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// Playfield width/height
    pub screen: Vec2,
    pub ball_size: Vec2,
    pub paddle_size: Vec2,
    /// Gap between a screen edge and its paddle
    pub paddle_margin: f32,
    /// Paddle movement per tick (human keys and AI recentring)
    pub paddle_step: f32,
    /// Tolerance around screen centre inside which a recentring AI rests
    pub ai_dead_zone: f32,
    /// Weight of horizontal ball speed in the AI tracking speed
    pub ai_horizontal_factor: f32,
    /// Hit offset divisor giving the post-bounce vertical speed
    pub deflection_divisor: f32,
    /// Horizontal speed gained per paddle hit
    pub rally_speed_up: f32,
    /// Cap on horizontal ball speed
    pub max_ball_speed_x: f32,
    /// Horizontal serve speed
    pub serve_speed_x: f32,
    /// Vertical serve speed range, sign chosen at random
    pub serve_speed_y_min: f32,
    pub serve_speed_y_max: f32,
    /// Score to win
    pub win_score: u8,
    /// Tick frequency (Hz)
    pub tick_hz: u16,
    /// Longest wall-clock frame fed to the simulation
    pub max_frame_time_ms: u32,
    /// Most ticks run to catch up after a slow frame
    pub max_ticks_per_frame: u32,
    /// Random seed
    pub seed: u64,
    /// Left paddle human-controlled
    pub two_player: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen: Vec2::new(640.0, 480.0),
            ball_size: Vec2::new(10.0, 10.0),
            paddle_size: Vec2::new(10.0, 50.0),
            paddle_margin: 20.0,
            paddle_step: 5.0,
            ai_dead_zone: 2.0,
            ai_horizontal_factor: 0.25,
            deflection_divisor: 7.0,
            rally_speed_up: 1.0,
            max_ball_speed_x: 18.0, // below ball width + paddle width
            serve_speed_x: 4.0,
            serve_speed_y_min: 1.0,
            serve_speed_y_max: 2.0,
            win_score: 10,
            tick_hz: 60,
            max_frame_time_ms: 250,
            max_ticks_per_frame: 5,
            seed: 0xC0FFEE,
            two_player: false,
        }
    }
}

impl Config {
    /// Check that every value yields a playable, finite simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("screen width", self.screen.width())?;
        positive("screen height", self.screen.height())?;
        positive("ball width", self.ball_size.width())?;
        positive("ball height", self.ball_size.height())?;
        positive("paddle width", self.paddle_size.width())?;
        positive("paddle height", self.paddle_size.height())?;
        positive("paddle step", self.paddle_step)?;
        positive("deflection divisor", self.deflection_divisor)?;
        positive("serve speed x", self.serve_speed_x)?;
        positive("max ball speed x", self.max_ball_speed_x)?;
        non_negative("paddle margin", self.paddle_margin)?;
        non_negative("ai dead zone", self.ai_dead_zone)?;
        non_negative("ai horizontal factor", self.ai_horizontal_factor)?;
        non_negative("rally speed up", self.rally_speed_up)?;
        non_negative("serve speed y min", self.serve_speed_y_min)?;
        non_negative("serve speed y max", self.serve_speed_y_max)?;

        if self.paddle_size.height() >= self.screen.height() {
            return Err(ConfigError::DoesNotFit {
                entity: "paddle",
                size: self.paddle_size,
                screen: self.screen,
            });
        }
        if self.ball_size.height() >= self.screen.height()
            || self.ball_size.width() >= self.screen.width()
        {
            return Err(ConfigError::DoesNotFit {
                entity: "ball",
                size: self.ball_size,
                screen: self.screen,
            });
        }
        if 2.0 * (self.paddle_margin + self.paddle_size.width()) >= self.screen.width() {
            return Err(ConfigError::PaddlesOverlap {
                margin: self.paddle_margin,
                width: self.paddle_size.width(),
                screen_width: self.screen.width(),
            });
        }
        if self.serve_speed_y_min > self.serve_speed_y_max {
            return Err(ConfigError::InvertedServeRange {
                min: self.serve_speed_y_min,
                max: self.serve_speed_y_max,
            });
        }
        if self.max_ball_speed_x < self.serve_speed_x {
            return Err(ConfigError::SpeedCapBelowServe {
                max: self.max_ball_speed_x,
                serve: self.serve_speed_x,
            });
        }
        if self.win_score == 0 {
            return Err(ConfigError::Zero { name: "win score" });
        }
        if self.tick_hz == 0 {
            return Err(ConfigError::Zero { name: "tick rate" });
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::Zero {
                name: "max ticks per frame",
            });
        }
        Ok(())
    }

    /// Duration of one simulation tick
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }

    pub fn max_frame_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.max_frame_time_ms))
    }

    /// Highest legal paddle y
    pub fn paddle_max_y(&self) -> f32 {
        (self.screen.height() - self.paddle_size.height()).max(0.0)
    }

    /// Top-left corner of a paddle in the reset layout
    pub fn paddle_home(&self, side: Side) -> Vec2 {
        let y = (self.screen.height() - self.paddle_size.height()) * 0.5;
        let x = match side {
            Side::Left => self.paddle_margin,
            Side::Right => self.screen.width() - self.paddle_margin - self.paddle_size.width(),
        };
        Vec2::new(x, y)
    }

    /// Top-left corner of the ball when centred on screen
    pub fn ball_home(&self) -> Vec2 {
        self.screen.half() - self.ball_size.half()
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_home_layout() {
        let config = Config::default();

        assert_eq!(config.ball_home(), Vec2::new(315.0, 235.0));
        assert_eq!(config.paddle_home(Side::Left), Vec2::new(20.0, 215.0));
        assert_eq!(config.paddle_home(Side::Right), Vec2::new(610.0, 215.0));
        assert_eq!(config.paddle_max_y(), 430.0);
    }

    #[test]
    fn test_rejects_paddle_taller_than_screen() {
        let config = Config {
            paddle_size: Vec2::new(10.0, 480.0),
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoesNotFit {
                entity: "paddle",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_divisor_and_nan() {
        let zero_divisor = Config {
            deflection_divisor: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            zero_divisor.validate(),
            Err(ConfigError::NotPositive {
                name: "deflection divisor",
                ..
            })
        ));

        let nan_step = Config {
            paddle_step: f32::NAN,
            ..Config::default()
        };
        assert!(nan_step.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_serve_and_inverted_range() {
        let still_ball = Config {
            serve_speed_x: 0.0,
            ..Config::default()
        };
        assert!(still_ball.validate().is_err());

        let inverted = Config {
            serve_speed_y_min: 3.0,
            serve_speed_y_max: 1.0,
            ..Config::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvertedServeRange { min: 3.0, max: 1.0 })
        );

        // A zero-width range is fine
        let fixed = Config {
            serve_speed_y_min: 1.5,
            serve_speed_y_max: 1.5,
            ..Config::default()
        };
        assert_eq!(fixed.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_overlapping_paddles_and_zero_counts() {
        let narrow = Config {
            screen: Vec2::new(50.0, 480.0),
            ..Config::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::PaddlesOverlap { .. })
        ));

        let no_win = Config {
            win_score: 0,
            ..Config::default()
        };
        assert_eq!(
            no_win.validate(),
            Err(ConfigError::Zero { name: "win score" })
        );

        let no_ticks = Config {
            tick_hz: 0,
            ..Config::default()
        };
        assert!(no_ticks.validate().is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvertedServeRange { min: 3.0, max: 1.0 };
        assert_eq!(
            err.to_string(),
            "serve vertical speed range is inverted: min 3 > max 1"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "win_score": 3, "two_player": true }"#).unwrap();

        assert_eq!(config.win_score, 3);
        assert!(config.two_player);
        assert_eq!(config.screen, Config::default().screen);
        assert_eq!(config.validate(), Ok(()));
    }
}
