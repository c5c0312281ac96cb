// Rust guideline compliant 2026-03-02

//! The runner contract and its worker loop.
//!
//! A [`Runner`] performs one unit of work per [`Runner::step`] and exposes
//! throughput through the [`Counter`] in its [`RunnerStats`]. The provided
//! [`Runner::run`] loop is the entire worker body: poll the interrupter,
//! step, tally. Error discipline, in order of precedence: `Interrupted`
//! stops the runner cleanly; `Unimplemented` is a programming error, logged
//! once and stopped; anything else is a per-step failure that is logged,
//! not counted, and retried forever -- transient backend errors are
//! expected in a stress test.
//!
//! Runners take `&self` everywhere so one instance can be shared between
//! its worker thread and the reporter; workload state lives behind interior
//! mutability.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clock::{self, Timestamp};
use crate::counter::{self, Counter};
use crate::interrupt::{Interrupted, Interrupter};
use crate::output::{HEADER_NAME_WIDTH, NAME_WIDTH, Style};

/// Why a step did not complete.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The interrupter fired; the runner must stop.
    #[error("interrupted")]
    Interrupted,
    /// The runner has no `step` implementation; refusing to spin.
    #[error("unimplemented step()")]
    Unimplemented,
    /// The step failed; the loop logs it and keeps running.
    #[error(transparent)]
    Failed(Box<dyn Error + Send + Sync>),
}

impl StepError {
    /// Wrap a transient failure.
    pub fn failed(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }
}

impl From<Interrupted> for StepError {
    fn from(_value: Interrupted) -> Self {
        Self::Interrupted
    }
}

/// Driver state every runner embeds: the step tally and the running flag.
#[derive(Debug)]
pub struct RunnerStats {
    steps: Counter,
    running: AtomicBool,
}

impl Default for RunnerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerStats {
    /// Create stats in the Running state with a fresh counter.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Counter::new(clock::now()), running: AtomicBool::new(true) }
    }

    /// The step counter. Owning worker writes, reporter reads.
    #[must_use]
    pub fn steps(&self) -> &Counter {
        &self.steps
    }

    /// Request the Stopped state. Irreversible; callable from any thread.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the runner is still in the Running state.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// A unit-of-work performer driven by a dedicated worker thread.
///
/// Implementors supply `name`, `stats`, and `step`; `report`, `total`, and
/// `header` have table-formatting defaults that an internal runner (one
/// that should not appear in the output) can override to suppress.
pub trait Runner: Send + Sync {
    /// Runner name, the first column of its rows.
    fn name(&self) -> &str;

    /// The embedded driver state.
    fn stats(&self) -> &RunnerStats;

    /// Perform one unit of work.
    ///
    /// # Errors
    ///
    /// [`StepError::Interrupted`] to stop cleanly, [`StepError::Failed`]
    /// for a transient failure the loop should ride through. The default
    /// refuses to spin with [`StepError::Unimplemented`].
    fn step(&self) -> Result<(), StepError> {
        Err(StepError::Unimplemented)
    }

    /// Append the header row for this runner's columns to `out`.
    fn header(&self, style: &Style, out: &mut String) {
        out.push_str("# ");
        out.push_str(&style.pad("name", HEADER_NAME_WIDTH));
        out.push_str(&style.ofs);
        out.push_str(&counter::header(style));
        out.push_str(&style.ors);
    }

    /// Append one data row to `out` and return the number of lines
    /// appended. Reporter-only. Internal runners return 0.
    fn report(&self, ti: Timestamp, style: &Style, out: &mut String) -> usize {
        out.push_str(&style.pad(self.name(), NAME_WIDTH));
        out.push_str(&style.ofs);
        out.push_str(&self.stats().steps().report(ti).render(style));
        out.push_str(&style.ors);
        1
    }

    /// Append the totals row to `out`. Called once at shutdown;
    /// reporter-only.
    fn total(&self, ti: Timestamp, style: &Style, out: &mut String) {
        out.push_str(&style.pad(self.name(), NAME_WIDTH));
        out.push_str(&style.ofs);
        out.push_str(&self.stats().steps().total(ti).render(style));
        out.push_str(&style.ors);
    }

    /// Cleanup hook invoked exactly once by [`run`](Self::run), on the
    /// worker thread, after the loop exits for any reason. Pipeline
    /// runners use it to unpark their peer (drain a queue, push a final
    /// nudge); the default does nothing.
    fn finish(&self) {}

    /// The worker body: step until stopped, then run the cleanup hook.
    fn run(&self, interrupter: &Interrupter) {
        while self.is_running() {
            let outcome = interrupter
                .check_for_interrupt()
                .map_err(StepError::from)
                .and_then(|()| self.step());
            match outcome {
                Ok(()) => self.stats().steps().add(1),
                Err(StepError::Interrupted) => self.stop(),
                Err(StepError::Unimplemented) => {
                    log::error!("{}: unimplemented step()", self.name());
                    self.stop();
                }
                Err(StepError::Failed(err)) => {
                    log::warn!("{}: step failed: {err}", self.name());
                }
            }
        }
        self.finish();
    }

    /// Request the Stopped state.
    fn stop(&self) {
        self.stats().stop();
    }

    /// Whether the runner is still running.
    fn is_running(&self) -> bool {
        self.stats().is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::{Runner, RunnerStats, StepError};
    use crate::clock;
    use crate::interrupt::Interrupter;
    use crate::output::Style;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct CountingRunner {
        name: String,
        stats: RunnerStats,
        limit: u64,
        done: AtomicU64,
    }

    impl CountingRunner {
        fn new(limit: u64) -> Self {
            Self {
                name: "count0".to_owned(),
                stats: RunnerStats::new(),
                limit,
                done: AtomicU64::new(0),
            }
        }
    }

    impl Runner for CountingRunner {
        fn name(&self) -> &str {
            &self.name
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }

        fn step(&self) -> Result<(), StepError> {
            let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
            if done >= self.limit {
                self.stop();
            }
            Ok(())
        }
    }

    struct FailingRunner {
        stats: RunnerStats,
    }

    impl Runner for FailingRunner {
        fn name(&self) -> &str {
            "fail0"
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }

        fn step(&self) -> Result<(), StepError> {
            Err(StepError::failed("backend went away"))
        }
    }

    struct DefaultStepRunner {
        stats: RunnerStats,
    }

    impl Runner for DefaultStepRunner {
        fn name(&self) -> &str {
            "default0"
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }
    }

    // RN-T01: a self-stopping runner counts exactly its steps.
    #[test]
    fn self_stop_counts_steps() {
        let runner = CountingRunner::new(25);
        runner.run(&Interrupter::new());
        assert!(!runner.is_running());
        assert_eq!(runner.stats().steps().value(), 25);
    }

    // RN-T02: an armed interrupter stops the runner before any step.
    #[test]
    fn interrupt_stops_without_stepping() {
        let runner = CountingRunner::new(u64::MAX);
        let interrupter = Interrupter::new();
        interrupter.interrupt();
        runner.run(&interrupter);
        assert!(!runner.is_running());
        assert_eq!(runner.stats().steps().value(), 0);
    }

    // RN-T03: the default step stops the runner with zero steps counted.
    #[test]
    fn unimplemented_step_stops() {
        let runner = DefaultStepRunner { stats: RunnerStats::new() };
        runner.run(&Interrupter::new());
        assert!(!runner.is_running());
        assert_eq!(runner.stats().steps().value(), 0);
    }

    // RN-T04: a runner whose step always fails never terminates on its
    // own and never counts a step.
    #[test]
    fn transient_failures_keep_running() {
        let runner = std::sync::Arc::new(FailingRunner { stats: RunnerStats::new() });
        let worker = {
            let runner = std::sync::Arc::clone(&runner);
            let interrupter = Interrupter::new();
            std::thread::spawn(move || runner.run(&interrupter))
        };
        std::thread::sleep(Duration::from_millis(50));
        assert!(runner.is_running(), "failing runner must keep spinning");
        assert_eq!(runner.stats().steps().value(), 0, "failed steps are not counted");
        runner.stop();
        worker.join().expect("worker thread");
    }

    // RN-T05: finish runs exactly once, on every exit path.
    #[test]
    fn finish_runs_once() {
        struct FinishingRunner {
            stats: RunnerStats,
            finished: AtomicU64,
        }

        impl Runner for FinishingRunner {
            fn name(&self) -> &str {
                "finish0"
            }

            fn stats(&self) -> &RunnerStats {
                &self.stats
            }

            fn step(&self) -> Result<(), StepError> {
                self.stop();
                Ok(())
            }

            fn finish(&self) {
                self.finished.fetch_add(1, Ordering::Relaxed);
            }
        }

        let runner = FinishingRunner { stats: RunnerStats::new(), finished: AtomicU64::new(0) };
        runner.run(&Interrupter::new());
        assert_eq!(runner.finished.load(Ordering::Relaxed), 1);

        let interrupted = FinishingRunner { stats: RunnerStats::new(), finished: AtomicU64::new(0) };
        let interrupter = Interrupter::new();
        interrupter.interrupt();
        interrupted.run(&interrupter);
        assert_eq!(interrupted.finished.load(Ordering::Relaxed), 1);
    }

    // RN-T06: default rows carry the name and the counter columns.
    #[test]
    fn default_rows() {
        let runner = CountingRunner::new(1);
        runner.run(&Interrupter::new());
        let style = Style::default();

        let mut header = String::new();
        runner.header(&style, &mut header);
        assert!(header.starts_with("# "));
        assert!(header.contains("i_ops"));

        let mut row = String::new();
        let lines = runner.report(clock::now(), &style, &mut row);
        assert_eq!(lines, 1);
        assert!(row.contains("count0"));

        let mut totals = String::new();
        runner.total(clock::now(), &style, &mut totals);
        assert!(totals.contains("total"));
    }
}
