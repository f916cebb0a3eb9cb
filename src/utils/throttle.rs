//! Randomized inter-request delay, the scheduling discipline that keeps
//! third-party rate limiters quiet. Injected into the sources so tests can
//! zero it out.

use rand::Rng;
use std::time::Duration;

use crate::utils::config::ThrottleConsts;

/// Uniformly randomized pause between external calls.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(ThrottleConsts::MIN_SLEEP_SECS),
            Duration::from_secs(ThrottleConsts::MAX_SLEEP_SECS),
        )
    }
}

impl Throttle {
    /// Build a policy sleeping uniformly within `[min, max]` per pause.
    /// Reversed bounds are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No-op policy for tests.
    pub fn zero() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Block for a randomized delay within the configured bounds.
    pub fn pause(&self) {
        if self.max.is_zero() {
            return;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        std::thread::sleep(Duration::from_secs_f64(secs));
    }
}
