// Rust guideline compliant 2026-03-04

//! Slow-operation watchdog.
//!
//! Wraps a single store call and logs a warning when it overruns the
//! configured threshold. Disabled by default: the zero threshold means
//! no timing overhead on the hot path.

use std::time::{Duration, Instant};

/// Logs a warning for store operations that exceed a latency threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watchdog {
    threshold: Option<Duration>,
}

impl Watchdog {
    /// Build from the `store.alarm-threshold` seconds value; zero or
    /// negative disables the watchdog.
    #[must_use]
    pub fn from_threshold_secs(secs: f64) -> Self {
        let threshold = (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f64(secs));
        Self { threshold }
    }

    /// Whether overruns will be reported.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.threshold.is_some()
    }

    /// Run `operation`, logging a warning tagged `name` if it overruns.
    pub fn observe<T>(&self, name: &str, operation: impl FnOnce() -> T) -> T {
        let Some(threshold) = self.threshold else {
            return operation();
        };
        let started = Instant::now();
        let result = operation();
        let elapsed = started.elapsed();
        if elapsed > threshold {
            log::warn!(
                "watchdog.slow_op: op={name} elapsed={:.3}s threshold={:.3}s",
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
        result
    }
}
