// Rust guideline compliant 2026-03-02

//! The orchestrator: one worker thread per runner, plus the reporter.
//!
//! [`execute_runners`] is called twice per run -- once with the setup
//! runners, once with the workload runners. Each pass spawns a dedicated
//! worker per runner, optionally arms a deadline that trips the
//! interrupter after a time budget, and drives the reporter on the calling
//! thread. Scoped threads make the join explicit: the pass returns only
//! after every worker and the reporter have finished.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::interrupt::Interrupter;
use crate::output::Style;
use crate::report::{ReportConfig, Reporter};
use crate::runner::Runner;

/// Granularity of the deadline watcher's polling.
const DEADLINE_POLL: Duration = Duration::from_millis(100);

/// Drive `runners` to completion.
///
/// Spawns one worker per runner executing [`Runner::run`], then runs the
/// reporter on the calling thread until every runner has stopped. With a
/// `deadline`, a watcher thread arms the interrupter once the budget
/// elapses; without one, the pass ends when the runners stop themselves
/// (or the interrupter fires externally).
///
/// # Errors
///
/// Propagates reporter write failures on `out`.
pub fn execute_runners<W: Write>(
    runners: &[Arc<dyn Runner>],
    interrupter: &Interrupter,
    style: &Style,
    config: &ReportConfig,
    deadline: Option<Duration>,
    out: &mut W,
) -> std::io::Result<()> {
    if runners.is_empty() {
        return Ok(());
    }

    thread::scope(|scope| {
        for runner in runners {
            let runner = Arc::clone(runner);
            scope.spawn(move || runner.run(interrupter));
        }
        if let Some(budget) = deadline {
            scope.spawn(move || watch_deadline(budget, runners, interrupter));
        }
        Reporter::new(runners, style, config).run(interrupter, out)
    })
}

/// Arm the interrupter once `budget` has elapsed, unless every runner
/// stops (or an interrupt arrives) first.
fn watch_deadline(budget: Duration, runners: &[Arc<dyn Runner>], interrupter: &Interrupter) {
    let deadline = Instant::now() + budget;
    loop {
        if interrupter.is_interrupted() {
            return;
        }
        if !runners.iter().any(|runner| runner.is_running()) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            log::info!("exec.deadline: time budget elapsed, interrupting workers");
            interrupter.interrupt();
            return;
        }
        thread::sleep((deadline - now).min(DEADLINE_POLL));
    }
}
