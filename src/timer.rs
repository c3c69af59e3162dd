use macroquad::time::get_frame_time;
use std::time::Duration;

/// Frame rate the arcade rules were tuned for.
pub const TICK_60HZ: Duration = Duration::from_nanos(16_666_667);

/// Longest frame a game update is allowed to see.
pub const MAX_FRAME: Duration = Duration::from_millis(40);

/// Time since the last frame, at most `MAX_FRAME`.
pub fn frame_time() -> Duration {
    Duration::from_secs_f32(get_frame_time()).min(MAX_FRAME)
}

/// Converts variable frame times into a whole number of fixed ticks.
#[derive(Clone, Debug)]
pub struct FixedStep {
    period: Duration,
    acc: Duration,
    max_ticks: u32,
}

impl FixedStep {
    /// `period` must be non-zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero());
        Self {
            period,
            acc: Duration::ZERO,
            max_ticks: 8,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks to run for a frame that took `dt`.
    ///
    /// Backlog beyond `max_ticks` is dropped so a stalled window does not
    /// fast-forward the game afterwards.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.acc += dt;
        let mut ticks = 0;
        while self.acc >= self.period {
            self.acc -= self.period;
            ticks += 1;
            if ticks == self.max_ticks {
                self.acc = Duration::ZERO;
                break;
            }
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.acc = Duration::ZERO;
    }
}

/// One-shot delay.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Countdown {
    left: Option<Duration>,
}

impl Countdown {
    pub fn start(&mut self, delay: Duration) {
        self.left = Some(delay);
    }

    pub fn cancel(&mut self) {
        self.left = None;
    }

    pub fn is_running(&self) -> bool {
        self.left.is_some()
    }

    /// Returns `true` exactly once, on the update at which the delay runs out.
    pub fn update(&mut self, dt: Duration) -> bool {
        match self.left {
            Some(left) => {
                let left = left.saturating_sub(dt);
                if left.is_zero() {
                    self.left = None;
                    true
                } else {
                    self.left = Some(left);
                    false
                }
            }
            None => false,
        }
    }
}
