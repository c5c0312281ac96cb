// Rust guideline compliant 2026-03-02

//! Per-runner throughput counter.
//!
//! A [`Counter`] is an atomic step tally plus the bookkeeping needed to
//! turn two successive observations into interval and cumulative rates.
//! The owning runner is the only writer ([`Counter::add`]); the reporter is
//! the only caller of [`Counter::report`] and [`Counter::total`], which it
//! serializes by construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::clock::{self, Timestamp};
use crate::output::{FLOAT_WIDTH, INT_WIDTH, Style};

#[derive(Debug)]
struct Window {
    last_t: Timestamp,
    last_val: u64,
}

/// Monotonic step tally with interval bookkeeping.
#[derive(Debug)]
pub struct Counter {
    t0: Timestamp,
    value: AtomicU64,
    window: Mutex<Window>,
}

/// One interval observation: what happened since the previous `report`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Steps since the previous report.
    pub delta: u64,
    /// Seconds since the previous report.
    pub period: f64,
    /// Steps since the counter was created.
    pub cumulative: u64,
    /// Seconds since the counter was created.
    pub elapsed: f64,
}

/// Final observation emitted once at shutdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Total {
    /// Steps since the counter was created.
    pub cumulative: u64,
    /// Seconds since the counter was created.
    pub elapsed: f64,
}

impl Counter {
    /// Create a counter whose epoch is `t0`.
    #[must_use]
    pub fn new(t0: Timestamp) -> Self {
        Self {
            t0,
            value: AtomicU64::new(0),
            window: Mutex::new(Window { last_t: t0, last_val: 0 }),
        }
    }

    /// Record `n` completed steps. Safe from the owning worker while the
    /// reporter reads.
    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Current cumulative tally.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn window(&self) -> MutexGuard<'_, Window> {
        // Only the reporter takes this lock; poison recovery keeps a late
        // totals pass working even after a panicking test observer.
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe the interval since the previous report and roll the window
    /// forward. Reporter-only.
    pub fn report(&self, ti: Timestamp) -> Interval {
        let mut window = self.window();
        let period = clock::to_secs(ti.saturating_sub(window.last_t));
        let elapsed = clock::to_secs(ti.saturating_sub(self.t0));

        let value = self.value();
        let delta = value - window.last_val;
        window.last_val = value;
        window.last_t = ti;

        Interval { delta, period, cumulative: value, elapsed }
    }

    /// Observe the cumulative tally without rolling the window.
    /// Reporter-only; idempotent.
    #[must_use]
    pub fn total(&self, ti: Timestamp) -> Total {
        Total {
            cumulative: self.value(),
            elapsed: clock::to_secs(ti.saturating_sub(self.t0)),
        }
    }
}

/// Column labels matching [`Interval::render`] and [`Total::render`].
#[must_use]
pub fn header(style: &Style) -> String {
    [
        style.pad("i_ops", INT_WIDTH),
        style.pad("i_time(s)", FLOAT_WIDTH + 1),
        style.pad("i_rate(/s)", FLOAT_WIDTH + 2),
        style.pad("c_ops", INT_WIDTH),
        style.pad("c_time(s)", FLOAT_WIDTH + 1),
        style.pad("c_rate(/s)", FLOAT_WIDTH + 2),
    ]
    .join(&style.ofs)
}

impl Interval {
    /// Render the six data columns. A zero period divides to infinity,
    /// which the reporter's minimum output period keeps out of real runs.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "tallies are far below 2^52")]
    pub fn render(&self, style: &Style) -> String {
        [
            style.int(self.delta),
            style.secs(self.period),
            style.rate(self.delta as f64 / self.period),
            style.int(self.cumulative),
            style.secs(self.elapsed),
            style.rate(self.cumulative as f64 / self.elapsed),
        ]
        .join(&style.ofs)
    }
}

impl Total {
    /// Render the totals columns: the literal `total` in place of the
    /// interval triple, then the cumulative triple.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "tallies are far below 2^52")]
    pub fn render(&self, style: &Style) -> String {
        [
            style.pad("total", INT_WIDTH),
            style.pad("", FLOAT_WIDTH + 1),
            style.pad("", FLOAT_WIDTH + 2),
            style.int(self.cumulative),
            style.secs(self.elapsed),
            style.rate(self.cumulative as f64 / self.elapsed),
        ]
        .join(&style.ofs)
    }
}

#[cfg(test)]
mod tests {
    use super::Counter;
    use crate::output::Style;

    const SECOND: u64 = 1_000_000_000;

    // C-T01: interval delta equals the adds performed between reports.
    #[test]
    fn interval_arithmetic() {
        let counter = Counter::new(0);
        counter.add(10);
        let first = counter.report(SECOND);
        assert_eq!(first.delta, 10);
        assert_eq!(first.cumulative, 10);
        assert!((first.period - 1.0).abs() < 1e-9);
        assert!((first.elapsed - 1.0).abs() < 1e-9);

        counter.add(5);
        counter.add(5);
        let second = counter.report(3 * SECOND);
        assert_eq!(second.delta, 10);
        assert_eq!(second.cumulative, 20);
        assert!((second.period - 2.0).abs() < 1e-9);
        assert!((second.elapsed - 3.0).abs() < 1e-9);
    }

    // C-T02: cumulative never decreases across reports.
    #[test]
    fn cumulative_monotonic() {
        let counter = Counter::new(0);
        let mut previous = 0;
        for t in 1..=20 {
            if t % 3 == 0 {
                counter.add(t);
            }
            let interval = counter.report(t * SECOND);
            assert!(interval.cumulative >= previous);
            previous = interval.cumulative;
        }
    }

    // C-T03: total does not roll the window and is idempotent.
    #[test]
    fn total_idempotent() {
        let counter = Counter::new(0);
        counter.add(4);
        let a = counter.total(2 * SECOND);
        let b = counter.total(2 * SECOND);
        assert_eq!(a, b);
        assert_eq!(a.cumulative, 4);

        // The next report still sees the full delta.
        assert_eq!(counter.report(2 * SECOND).delta, 4);
    }

    // C-T04: zero period renders an infinite rate without panicking.
    #[test]
    fn zero_period_is_infinite_rate() {
        let counter = Counter::new(0);
        counter.add(1);
        let interval = counter.report(0);
        assert!((interval.delta as f64 / interval.period).is_infinite());
        let line = interval.render(&Style::default());
        assert!(line.contains("inf"));
    }

    #[test]
    fn rendered_columns_line_up_with_header() {
        let style = Style::default();
        let header = super::header(&style);
        let counter = Counter::new(0);
        counter.add(3);
        let line = counter.report(SECOND).render(&style);
        assert_eq!(
            header.split(&style.ofs).count(),
            line.split(&style.ofs).count(),
            "header and data rows must have the same column count"
        );
    }
}
