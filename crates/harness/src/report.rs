// Rust guideline compliant 2026-03-02

//! The reporter: periodic table emission and totals at shutdown.
//!
//! The reporter is the sole writer of the output stream, which keeps rows
//! intact without any locking in the runners. Each tick it assembles the
//! header (when due) and one `report()` row per runner into a buffer, then
//! writes the buffer at once. It exits when no runner is running or the
//! interrupter fires, waits for stragglers to stop, and emits one totals
//! row per runner. A runner may stop between the poll and the print; the
//! resulting duplicate totals are harmless because counters are monotonic
//! and `total` is idempotent.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::clock;
use crate::interrupt::Interrupter;
use crate::options::{OptionError, OptionMap};
use crate::output::Style;
use crate::runner::Runner;

/// Shortest allowed tick; keeps interval periods away from zero.
const MIN_OUTPUT_PERIOD: Duration = Duration::from_millis(1);

/// How often the reporter re-checks stragglers before printing totals.
const STRAGGLER_POLL: Duration = Duration::from_millis(10);

/// Reporter cadence settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Seconds between output ticks.
    pub output_period: Duration,
    /// Data lines between header reprints; zero or negative prints the
    /// header once at the start only.
    pub header_period: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { output_period: Duration::from_secs(1), header_period: 20 }
    }
}

impl ReportConfig {
    /// Build the cadence from parsed options, clamping the period to the
    /// reporter's minimum.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] when a display option is missing from
    /// `opts` or mistyped.
    pub fn from_options(opts: &OptionMap) -> Result<Self, OptionError> {
        let period = opts.get_f64("output-period")?;
        let output_period = if period.is_finite() && period > 0.0 {
            Duration::from_secs_f64(period).max(MIN_OUTPUT_PERIOD)
        } else {
            MIN_OUTPUT_PERIOD
        };
        Ok(Self { output_period, header_period: opts.get_i64("header-period")? })
    }
}

/// Periodically reads every runner's counter and writes the table.
pub struct Reporter<'a> {
    runners: &'a [Arc<dyn Runner>],
    style: &'a Style,
    config: &'a ReportConfig,
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("runners", &self.runners.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a> Reporter<'a> {
    /// Create a reporter over `runners`.
    #[must_use]
    pub fn new(runners: &'a [Arc<dyn Runner>], style: &'a Style, config: &'a ReportConfig) -> Self {
        Self { runners, style, config }
    }

    fn any_running(&self) -> bool {
        self.runners.iter().any(|runner| runner.is_running())
    }

    fn header_due(&self, header_printed: bool, lines_since_header: usize) -> bool {
        if !header_printed {
            return true;
        }
        self.config.header_period > 0
            && u64::try_from(lines_since_header)
                .is_ok_and(|lines| lines >= self.config.header_period.unsigned_abs())
    }

    /// Tick until every runner has stopped (or the interrupter fires),
    /// then emit totals. Call from exactly one thread.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the output stream.
    pub fn run<W: Write>(&self, interrupter: &Interrupter, out: &mut W) -> std::io::Result<()> {
        if self.runners.is_empty() {
            return Ok(());
        }

        let mut header_printed = false;
        let mut lines_since_header = 0_usize;

        loop {
            thread::sleep(self.config.output_period);
            if !self.any_running() || interrupter.is_interrupted() {
                break;
            }

            let ti = clock::now();
            let mut buf = String::new();
            if self.header_due(header_printed, lines_since_header) {
                if let Some(representative) = self.runners.first() {
                    representative.header(self.style, &mut buf);
                }
                header_printed = true;
                lines_since_header = 0;
            }
            for runner in self.runners {
                lines_since_header += runner.report(ti, self.style, &mut buf);
            }
            out.write_all(buf.as_bytes())?;
            out.flush()?;
        }

        // Let stragglers reach their stop so totals cover the last steps.
        while self.any_running() {
            thread::sleep(STRAGGLER_POLL);
        }

        let ti = clock::now();
        let mut buf = String::new();
        for runner in self.runners {
            runner.total(ti, self.style, &mut buf);
        }
        out.write_all(buf.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportConfig, Reporter};
    use crate::interrupt::Interrupter;
    use crate::options::{Configurable as _, OptionMap};
    use crate::output::{DisplayOptions, Style};
    use crate::runner::{Runner, RunnerStats, StepError};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Steps forever; the test stops it.
    struct TickingRunner {
        name: String,
        stats: RunnerStats,
    }

    impl TickingRunner {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self { name: name.to_owned(), stats: RunnerStats::new() })
        }
    }

    impl Runner for TickingRunner {
        fn name(&self) -> &str {
            &self.name
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }

        fn step(&self) -> Result<(), StepError> {
            thread::sleep(Duration::from_millis(1));
            Ok(())
        }
    }

    /// Suppresses its rows like a background generator.
    struct SilentRunner {
        stats: RunnerStats,
    }

    impl Runner for SilentRunner {
        fn name(&self) -> &str {
            "gen0"
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }

        fn report(&self, _ti: crate::Timestamp, _style: &Style, _out: &mut String) -> usize {
            0
        }

        fn total(&self, _ti: crate::Timestamp, _style: &Style, _out: &mut String) {}
    }

    fn count_lines(output: &str, predicate: impl Fn(&str) -> bool) -> usize {
        output.lines().filter(|line| predicate(line)).count()
    }

    // RP-T01: header reprints follow ceil(rows / header-period).
    #[test]
    fn header_reprint_law() {
        let runner = TickingRunner::new("tick0");
        let runners: Vec<Arc<dyn Runner>> = vec![Arc::clone(&runner) as Arc<dyn Runner>];
        let style = Style::default();
        let config = ReportConfig { output_period: Duration::from_millis(5), header_period: 2 };
        let reporter = Reporter::new(&runners, &style, &config);
        let interrupter = Interrupter::new();

        let stopper = {
            let runner = Arc::clone(&runner);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(60));
                runner.stop();
            })
        };
        let mut out = Vec::new();
        reporter.run(&interrupter, &mut out).unwrap();
        stopper.join().expect("stopper thread");

        let output = String::from_utf8(out).unwrap();
        let headers = count_lines(&output, |l| l.starts_with("# "));
        let data_rows = count_lines(&output, |l| l.contains("tick0") && !l.contains("total"));
        assert!(data_rows >= 1, "expected at least one data row:\n{output}");
        // One data row per tick, header every second row.
        assert_eq!(headers, data_rows.div_ceil(2), "output was:\n{output}");
        // Exactly one totals row, after the data rows.
        assert_eq!(count_lines(&output, |l| l.contains("total")), 1);
        assert!(output.trim_end().lines().next_back().unwrap().contains("total"));
    }

    // RP-T02: header-period <= 0 prints the header once at the start.
    #[test]
    fn non_positive_header_period_prints_once() {
        for header_period in [0, -5] {
            let runner = TickingRunner::new("tick0");
            let runners: Vec<Arc<dyn Runner>> = vec![Arc::clone(&runner) as Arc<dyn Runner>];
            let style = Style::default();
            let config = ReportConfig { output_period: Duration::from_millis(5), header_period };
            let reporter = Reporter::new(&runners, &style, &config);

            let stopper = {
                let runner = Arc::clone(&runner);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(50));
                    runner.stop();
                })
            };
            let mut out = Vec::new();
            reporter.run(&Interrupter::new(), &mut out).unwrap();
            stopper.join().expect("stopper thread");

            let output = String::from_utf8(out).unwrap();
            assert_eq!(
                count_lines(&output, |l| l.starts_with("# ")),
                1,
                "header-period={header_period} output:\n{output}"
            );
        }
    }

    // RP-T03: no runners means no rows, no header, no totals.
    #[test]
    fn empty_runner_set_is_silent() {
        let runners: Vec<Arc<dyn Runner>> = vec![];
        let style = Style::default();
        let config = ReportConfig::default();
        let reporter = Reporter::new(&runners, &style, &config);
        let mut out = Vec::new();
        reporter.run(&Interrupter::new(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    // RP-T04: suppressed runners contribute no rows but still stop the
    // reporter when they finish.
    #[test]
    fn suppressed_runner_emits_nothing() {
        let silent = Arc::new(SilentRunner { stats: RunnerStats::new() });
        let runners: Vec<Arc<dyn Runner>> = vec![Arc::clone(&silent) as Arc<dyn Runner>];
        let style = Style::default();
        let config = ReportConfig { output_period: Duration::from_millis(5), header_period: 20 };
        let reporter = Reporter::new(&runners, &style, &config);

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(25));
            silent.stop();
        });
        let mut out = Vec::new();
        reporter.run(&Interrupter::new(), &mut out).unwrap();
        stopper.join().expect("stopper thread");

        let output = String::from_utf8(out).unwrap();
        assert_eq!(count_lines(&output, |l| l.contains("gen0")), 0, "output:\n{output}");
    }

    // RP-T05: an interrupt ends data rows; totals still appear once the
    // runners stop.
    #[test]
    fn interrupt_cuts_to_totals() {
        let runner = TickingRunner::new("tick0");
        let runners: Vec<Arc<dyn Runner>> = vec![Arc::clone(&runner) as Arc<dyn Runner>];
        let style = Style::default();
        let config = ReportConfig { output_period: Duration::from_millis(5), header_period: 20 };
        let reporter = Reporter::new(&runners, &style, &config);
        let interrupter = Interrupter::new();

        let side = {
            let interrupter = interrupter.clone();
            let runner = Arc::clone(&runner);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                interrupter.interrupt();
                // The worker loop would notice the flag; no worker here,
                // so stop the runner directly.
                thread::sleep(Duration::from_millis(5));
                runner.stop();
            })
        };
        let mut out = Vec::new();
        reporter.run(&interrupter, &mut out).unwrap();
        side.join().expect("side thread");

        let output = String::from_utf8(out).unwrap();
        let last = output.trim_end().lines().next_back().unwrap();
        assert!(last.contains("total"), "last line must be a totals row:\n{output}");
    }

    #[test]
    fn config_from_display_options_clamps_period() {
        let mut opts = OptionMap::from_defaults(&DisplayOptions.options());
        opts.set_parsed("output-period", "0").unwrap();
        let config = ReportConfig::from_options(&opts).unwrap();
        assert_eq!(config.output_period, super::MIN_OUTPUT_PERIOD);
        assert_eq!(config.header_period, 20);
    }
}
