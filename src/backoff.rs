use rand::prelude::*;
use rand::rngs::ThreadRng;
use std::time::Duration;

/// Exponential backoff with jitter
///
/// The `n`-th retry waits `initial * multiplier^n`, scaled by a random factor
/// in `[1 - jitter, 1 + jitter)` and capped at `max`.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    pub initial: Duration,
    pub multiplier: f64,
    pub max: Duration,
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            multiplier: 2.,
            max: Duration::from_secs(1),
            jitter: 0.2,
        }
    }
}

/// [`Backoff`] can be created from a [`BackoffConfig`]
///
/// Consecutive calls to [`Backoff::next`] will return the next backoff interval
#[derive(Debug)]
pub struct Backoff<R = ThreadRng> {
    initial_ms: f64,
    max_ms: f64,
    multiplier: f64,
    jitter: f64,
    exp_max: f64,
    attempts: u32,
    rng: R,
}

impl Backoff<ThreadRng> {
    /// Create a new [`Backoff`] from the provided [`BackoffConfig`]
    pub fn new(config: &BackoffConfig) -> Self {
        Self::new_with_rng(config, rand::rng())
    }
}

impl<R: Rng> Backoff<R> {
    pub fn new_with_rng(config: &BackoffConfig, rng: R) -> Self {
        let initial_ms = config.initial.as_secs_f64() * 1000.;
        let max_ms = config.max.as_secs_f64() * 1000.;
        let exp_max = if max_ms > initial_ms && config.multiplier > 1. {
            (max_ms / initial_ms.max(1.)).ln() / config.multiplier.ln()
        } else {
            0.
        };

        Self {
            initial_ms,
            max_ms,
            multiplier: config.multiplier,
            jitter: config.jitter.clamp(0., 1.),
            exp_max,
            attempts: 0,
            rng,
        }
    }

    /// Backoff to wait before retry number `attempts` (starting at 0).
    pub fn backoff(&mut self, attempts: u32) -> Duration {
        if self.exp_max == 0. {
            return Duration::from_millis(self.initial_ms.round() as u64);
        }

        let exp = f64::from(attempts).min(self.exp_max);
        let term = self.initial_ms * self.multiplier.powf(exp);
        // A jitter below the f64 resolution around 1.0 leaves an empty range.
        let (low, high) = (1. - self.jitter, 1. + self.jitter);
        let random_factor = if low < high {
            self.rng.random_range(low..high)
        } else {
            1.
        };

        let backoff_ms = (term * random_factor).min(self.max_ms).round();
        Duration::from_millis(backoff_ms as u64)
    }

    /// Returns the next backoff duration to wait for
    pub fn next(&mut self) -> Duration {
        let d = self.backoff(self.attempts);
        self.attempts = self.attempts.saturating_add(1);
        d
    }

    /// Start over from the initial interval.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
