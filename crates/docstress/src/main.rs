// Rust guideline compliant 2026-03-06

//! Stress-tool entry point.
//!
//! Wires the in-memory `DocumentStore` adapter to the workload registries
//! and drives the two phases: setup (drop + fill collections via
//! generator/loader pairs) and workload (point queries, range scans,
//! updates) under a time budget. SIGINT interrupts cooperatively; a
//! second SIGINT kills the process hard.
//!
//! # Usage
//!
//! ```text
//! # Fill four collections, then stress them for 60 seconds
//! docstress --updates.threads=4 --point-queries.threads=4
//!
//! # Same options from a config file, plus extra log output
//! RUST_LOG=debug docstress @stress.cnf --verbose
//! ```

mod adapters;
mod cli;

use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use adapters::memory_store::MemoryStore;
use anyhow::Context as _;
use domain::DocumentStore;
use harness::factory::FactoryRegistry;
use harness::interrupt::Interrupter;
use harness::options::{Configurable, OptionDescriptor, OptionMap, OptionValue};
use harness::output::{DisplayOptions, Style};
use harness::registry::RegistryError;
use harness::report::ReportConfig;
use harness::runner::Runner;
use harness::setup::{Setup, SetupRegistry};
use harness::execute_runners;

/// Exit code for option-parse failures (EINVAL).
const INVALID_ARGUMENT: u8 = 22;

/// Exit code when a second SIGINT aborts cooperative shutdown.
const SECOND_SIGINT_EXIT: i32 = 130;

/// Setup-registry entry that defines the execution options.
#[derive(Debug, Clone, Copy, Default)]
struct ExecutionOptions;

impl Configurable for ExecutionOptions {
    fn options(&self) -> Vec<OptionDescriptor> {
        vec![OptionDescriptor::new(
            "seconds",
            "Time to run the workload phase for; 0 runs until interrupted.",
            OptionValue::Float(60.0),
        )]
    }
}

impl Setup for ExecutionOptions {}

fn init_registries<S: DocumentStore + 'static>(
    store: &Arc<S>,
    setups: &mut SetupRegistry,
    factories: &mut FactoryRegistry,
) -> Result<(), RegistryError> {
    setups.register("Display", Box::new(DisplayOptions))?;
    setups.register("Execution", Box::new(ExecutionOptions))?;
    workloads::register(store, setups, factories)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn install_signal_hook(interrupter: &Interrupter) -> anyhow::Result<()> {
    let interrupter = interrupter.clone();
    ctrlc::set_handler(move || {
        if interrupter.is_interrupted() {
            // Cooperative shutdown already requested once; give up.
            std::process::exit(SECOND_SIGINT_EXIT);
        }
        log::info!("main.interrupt: stopping workers (press again to kill)");
        interrupter.interrupt();
    })
    .context("failed to install SIGINT handler")
}

fn run(
    opts: &OptionMap,
    setups: &SetupRegistry,
    factories: &FactoryRegistry,
    interrupter: &Interrupter,
) -> anyhow::Result<()> {
    let style = Style::from_options(opts).context("display options")?;
    let report_config = ReportConfig::from_options(opts).context("display options")?;
    let seconds = opts.get_f64("seconds").context("execution options")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    setups.setup_all(opts).context("setup hooks")?;

    let mut seed_runners: Vec<Arc<dyn Runner>> = Vec::new();
    setups.generate_setup_runners(opts, &mut seed_runners).context("setup runners")?;
    log::info!("main.setup: runners={}", seed_runners.len());
    execute_runners(&seed_runners, interrupter, &style, &report_config, None, &mut out)
        .context("setup phase")?;

    if interrupter.is_interrupted() {
        log::info!("main.interrupted: skipping the workload phase");
        return Ok(());
    }

    let mut runners: Vec<Arc<dyn Runner>> = Vec::new();
    factories.generate_all(opts, &mut runners).context("workload runners")?;
    let deadline =
        (seconds.is_finite() && seconds > 0.0).then(|| Duration::from_secs_f64(seconds));
    log::info!("main.workload: runners={} seconds={seconds}", runners.len());
    execute_runners(&runners, interrupter, &style, &report_config, deadline, &mut out)
        .context("workload phase")?;

    out.flush().context("flushing output")?;
    Ok(())
}

fn main() -> ExitCode {
    // The log filter depends on --verbose, which is parsed below; a plain
    // pre-scan keeps early diagnostics (registration, parse) logged too.
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().skip(1).any(|arg| arg == "--verbose" || arg == "-v");
    init_logging(verbose);

    let store = Arc::new(MemoryStore::new());
    let mut setup_registry = SetupRegistry::new("Setup");
    let mut factory_registry = FactoryRegistry::new("Runners");
    if let Err(err) = init_registries(&store, &mut setup_registry, &mut factory_registry) {
        log::error!("main.init: {err}");
        return ExitCode::FAILURE;
    }

    let opts = match cli::parse(args, &setup_registry, &factory_registry) {
        Ok(cli::Parsed::Run(opts)) => opts,
        Ok(cli::Parsed::Help) => return ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("docstress: error parsing command line: {err}");
            eprintln!("docstress: run with --help for the option list");
            return ExitCode::from(INVALID_ARGUMENT);
        }
    };

    let interrupter = Interrupter::new();
    if let Err(err) = install_signal_hook(&interrupter) {
        log::error!("main.init: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(&opts, &setup_registry, &factory_registry, &interrupter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("main.fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}
