//! Fixed-step frame pacing from a monotonic clock.

use crate::config::Config;
use std::time::{Duration, Instant};

/// Turns wall-clock frames into a whole number of fixed simulation ticks.
///
/// Elapsed time per frame is clamped, so a stalled process resumes with at
/// most `max_ticks` steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick: Duration,
    max_frame: Duration,
    max_ticks: u32,
    accumulator: Duration,
    last_frame: Option<Instant>,
    last_delta: Duration,
}

impl FrameClock {
    pub fn new(tick: Duration, max_frame: Duration, max_ticks: u32) -> Self {
        FrameClock {
            tick,
            max_frame,
            max_ticks: max_ticks.max(1),
            accumulator: Duration::ZERO,
            last_frame: None,
            last_delta: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tick_duration(),
            config.max_frame_time(),
            config.max_ticks_per_frame,
        )
    }

    /// Fixed simulation step
    pub fn dt(&self) -> Duration {
        self.tick
    }

    /// Clamped elapsed time of the most recent frame
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    pub fn last_frame(&self) -> Option<Instant> {
        self.last_frame
    }

    /// Record a frame at `now` and return how many ticks to simulate.
    /// The first frame only starts the clock.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_frame.replace(now) else {
            self.last_delta = Duration::ZERO;
            return 0;
        };

        let mut elapsed = now.saturating_duration_since(last);
        if elapsed > self.max_frame {
            log::warn!(
                "frame took {:.1} ms, clamping to {:.1} ms",
                elapsed.as_secs_f64() * 1000.0,
                self.max_frame.as_secs_f64() * 1000.0
            );
            elapsed = self.max_frame;
        }
        self.last_delta = elapsed;
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < self.max_ticks {
            self.accumulator -= self.tick;
            ticks += 1;
        }

        // Drop the backlog we refuse to catch up on
        if ticks == self.max_ticks && self.accumulator >= self.tick {
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    /// Forget the previous frame, e.g. after a pause
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last_frame = None;
        self.last_delta = Duration::ZERO;
    }
}
