// Rust guideline compliant 2026-03-02

//! The setup phase: one-shot hooks plus self-terminating seed runners.
//!
//! A [`Setup`] entry is a factory with an extra synchronous hook. The
//! orchestration order is fixed: every registered `setup()` hook runs
//! before any setup runner is launched, and all setup runners are driven
//! to completion before workload runners exist. A typical entry drops and
//! refills collections: the hook drops, a generator/loader runner pair
//! refills.

use std::error::Error;
use std::sync::Arc;

use crate::options::{Configurable, OptionError, OptionMap};
use crate::registry::Registry;
use crate::runner::Runner;

/// The registry setup entries live in.
pub type SetupRegistry = Registry<dyn Setup>;

/// Errors raised by setup hooks.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// An option was missing or mistyped.
    #[error(transparent)]
    Options(#[from] OptionError),
    /// The one-shot hook failed; setup errors are fatal.
    #[error("setup failed: {0}")]
    Failed(#[source] Box<dyn Error + Send + Sync>),
}

impl SetupError {
    /// Wrap a hook failure.
    pub fn failed(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }
}

/// A pre-workload participant: option surface, one-shot hook, seed runners.
pub trait Setup: Configurable + Send + Sync {
    /// One-shot synchronous work performed before any runner launches.
    /// No-op by default.
    ///
    /// # Errors
    ///
    /// Any [`SetupError`] aborts the run before workers exist.
    fn setup(&self, opts: &OptionMap) -> Result<(), SetupError> {
        let _ = opts;
        Ok(())
    }

    /// Append runners whose job is to finish setup and stop themselves.
    /// Contributes none by default.
    ///
    /// # Errors
    ///
    /// Any [`SetupError`] aborts the run before workers exist.
    fn generate_setup_runners(
        &self,
        opts: &OptionMap,
        out: &mut Vec<Arc<dyn Runner>>,
    ) -> Result<(), SetupError> {
        let _ = (opts, out);
        Ok(())
    }
}

impl Registry<dyn Setup> {
    /// Run every entry's one-shot hook, in stable order.
    ///
    /// # Errors
    ///
    /// Propagates the first hook's [`SetupError`].
    pub fn setup_all(&self, opts: &OptionMap) -> Result<(), SetupError> {
        for (name, entry) in self.entries() {
            log::debug!("setup.run: entry={name}");
            entry.setup(opts)?;
        }
        Ok(())
    }

    /// Collect every entry's setup runners, in stable order.
    ///
    /// # Errors
    ///
    /// Propagates the first entry's [`SetupError`].
    pub fn generate_setup_runners(
        &self,
        opts: &OptionMap,
        out: &mut Vec<Arc<dyn Runner>>,
    ) -> Result<(), SetupError> {
        for (_, entry) in self.entries() {
            entry.generate_setup_runners(opts, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Setup, SetupError, SetupRegistry};
    use crate::options::{Configurable, OptionMap};
    use crate::runner::{Runner, RunnerStats, StepError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSetup {
        calls: Arc<AtomicUsize>,
        runners: usize,
    }

    struct OneShotRunner {
        stats: RunnerStats,
    }

    impl Runner for OneShotRunner {
        fn name(&self) -> &str {
            "seed0"
        }

        fn stats(&self) -> &RunnerStats {
            &self.stats
        }

        fn step(&self) -> Result<(), StepError> {
            self.stop();
            Ok(())
        }
    }

    impl Configurable for RecordingSetup {}

    impl Setup for RecordingSetup {
        fn setup(&self, _opts: &OptionMap) -> Result<(), SetupError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn generate_setup_runners(
            &self,
            _opts: &OptionMap,
            out: &mut Vec<Arc<dyn Runner>>,
        ) -> Result<(), SetupError> {
            for _ in 0..self.runners {
                out.push(Arc::new(OneShotRunner { stats: RunnerStats::new() }));
            }
            Ok(())
        }
    }

    // S-T01: every hook runs exactly once, then runners are collected.
    #[test]
    fn hooks_then_runners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = SetupRegistry::new("Setup");
        registry
            .register("First", Box::new(RecordingSetup { calls: Arc::clone(&calls), runners: 2 }))
            .unwrap();
        registry
            .register("Second", Box::new(RecordingSetup { calls: Arc::clone(&calls), runners: 0 }))
            .unwrap();

        let opts = OptionMap::default();
        registry.setup_all(&opts).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2);

        let mut runners = Vec::new();
        registry.generate_setup_runners(&opts, &mut runners).unwrap();
        assert_eq!(runners.len(), 2);
    }

    // S-T02: a setup with neither hook nor runners is valid (an entry may
    // exist only to define options).
    #[test]
    fn options_only_setup() {
        struct Bare;
        impl Configurable for Bare {}
        impl Setup for Bare {}

        let mut registry = SetupRegistry::new("Setup");
        registry.register("Bare", Box::new(Bare)).unwrap();

        let opts = OptionMap::default();
        registry.setup_all(&opts).unwrap();
        let mut runners = Vec::new();
        registry.generate_setup_runners(&opts, &mut runners).unwrap();
        assert!(runners.is_empty());
    }
}
