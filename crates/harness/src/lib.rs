// Rust guideline compliant 2026-03-02

//! Concurrent runner framework for the document-store stress tool.
//!
//! The crate is the generic half of the stress tester: runners stepped in
//! tight loops by dedicated worker threads, factories that build them from
//! parsed options, registries that aggregate the option surface, a bounded
//! batch queue for producer/consumer pipelines, a cooperative interrupter,
//! per-runner throughput counters, and the reporter/orchestrator pair that
//! drives a run.
//!
//! Entry points: [`exec::execute_runners`], [`registry::Registry`],
//! [`runner::Runner`].

pub mod clock;
pub mod counter;
pub mod exec;
pub mod factory;
pub mod interrupt;
pub mod options;
pub mod output;
pub mod queue;
pub mod registry;
pub mod report;
pub mod runner;
pub mod setup;

pub use clock::Timestamp;
pub use counter::Counter;
pub use exec::execute_runners;
pub use factory::{Factory, FactoryRegistry, NFactory};
pub use interrupt::{Interrupted, Interrupter};
pub use options::{Configurable, OptionDescriptor, OptionError, OptionMap, OptionValue};
pub use output::{DisplayOptions, Style};
pub use queue::BatchQueue;
pub use registry::{Registry, RegistryError};
pub use report::{ReportConfig, Reporter};
pub use runner::{Runner, RunnerStats, StepError};
pub use setup::{Setup, SetupError, SetupRegistry};
