// Rust guideline compliant 2026-03-02

//! Monotonic timestamps.
//!
//! A [`Timestamp`] is a nanosecond tick count since a process-wide epoch
//! taken lazily on first use. Ticks are cheap to capture, monotonic within
//! one process, and never meaningful across machines. An OS monotonic
//! clock is immune to the frequency scaling and cross-socket drift of raw
//! CPU cycle counters, and its tick rate is a constant rather than a
//! probe that can fail.

use std::time::Instant;

use once_cell::sync::Lazy;

/// Monotonic nanosecond tick count. Subtract two to get an interval.
pub type Timestamp = u64;

/// Ticks per second of [`now`].
pub const TICKS_PER_SECOND: u64 = 1_000_000_000;

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Current monotonic timestamp.
#[must_use]
pub fn now() -> Timestamp {
    // A u64 of nanoseconds covers ~584 years of process uptime.
    u64::try_from(EPOCH.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Convert a tick interval to seconds.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "intervals are far below 2^52 ns")]
pub fn to_secs(ticks: Timestamp) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}
