// Rust guideline compliant 2026-03-06

//! Command-line and response-file parsing.
//!
//! The option surface is assembled at runtime from the two registries, so
//! `--help` lists every registered section under its own heading and an
//! option like `--updates.threads=8` exists exactly when its factory is
//! registered. Arguments of the form `@file` are rewritten to
//! `--response-file=file` before parsing; response files hold
//! `key = value` lines with optional `[section]` headers. Precedence:
//! command line over response files, later files over earlier ones.

use std::fs;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use harness::factory::FactoryRegistry;
use harness::options::{OptionDescriptor, OptionError, OptionMap, OptionValue};
use harness::registry::OptionGroup;
use harness::setup::SetupRegistry;

/// Parse failures; all of them exit with the invalid-argument code.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// clap rejected the command line (unknown option, bad syntax).
    #[error(transparent)]
    Usage(#[from] clap::Error),
    /// A value failed to parse against its descriptor.
    #[error(transparent)]
    BadOption(#[from] OptionError),
    /// A response file line is not `key = value` or `[section]`.
    #[error("bad config line in {path}: `{line}`")]
    Config {
        /// The offending file.
        path: String,
        /// The offending line.
        line: String,
    },
}

/// Outcome of a parse.
#[derive(Debug)]
pub enum Parsed {
    /// Run with these options.
    Run(OptionMap),
    /// Help was requested and has been printed.
    Help,
}

/// Rewrite `@file` arguments to `--response-file=file`, leaving the
/// program name (the first argument) untouched.
fn preprocess<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i > 0 && let Some(path) = arg.strip_prefix('@') {
                format!("--response-file={path}")
            } else {
                arg
            }
        })
        .collect()
}

fn value_name(default: &OptionValue) -> &'static str {
    match default {
        OptionValue::Bool(_) => "BOOL",
        OptionValue::Uint(_) | OptionValue::Int(_) => "N",
        OptionValue::Float(_) => "X",
        OptionValue::Str(_) => "STR",
    }
}

fn build_command(groups: &[OptionGroup]) -> Command {
    let mut cmd = Command::new("docstress")
        .about("Workload generator and stress tester for a document store")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("More verbose output.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("response-file")
                .long("response-file")
                .value_name("FILE")
                .help("Config file; may also be given as @FILE.")
                .action(ArgAction::Append),
        );
    for group in groups {
        for descriptor in &group.options {
            cmd = cmd.arg(
                Arg::new(descriptor.name.clone())
                    .long(descriptor.name.clone())
                    .value_name(value_name(&descriptor.default))
                    .help(format!(
                        "{} [default: {}]",
                        descriptor.help,
                        descriptor.default.render_default()
                    ))
                    .action(ArgAction::Set)
                    .help_heading(group.title.clone()),
            );
        }
    }
    cmd
}

/// Split a response file into `(name, raw value)` pairs.
fn parse_config_file(path: &str, text: &str) -> Result<Vec<(String, String)>, CliError> {
    let mut section = String::new();
    let mut pairs = Vec::new();
    for raw_line in text.lines() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = inner.trim().to_owned();
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(CliError::Config { path: path.to_owned(), line: raw_line.to_owned() });
        };
        let key = key.trim();
        let name =
            if section.is_empty() { key.to_owned() } else { format!("{section}.{key}") };
        pairs.push((name, value.trim().to_owned()));
    }
    Ok(pairs)
}

/// Parse `args` against the merged option surface of both registries.
///
/// # Errors
///
/// Returns [`CliError`] for unknown options, malformed values, or
/// malformed response files; the caller exits with the invalid-argument
/// code.
pub fn parse<I: IntoIterator<Item = String>>(
    args: I,
    setups: &SetupRegistry,
    factories: &FactoryRegistry,
) -> Result<Parsed, CliError> {
    let mut groups = setups.all_options();
    groups.extend(factories.all_options());

    let matches = match build_command(&groups).try_get_matches_from(preprocess(args)) {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            let _ = err.print();
            return Ok(Parsed::Help);
        }
        Err(err) => return Err(err.into()),
    };

    let descriptors: Vec<&OptionDescriptor> =
        groups.iter().flat_map(|group| group.options.iter()).collect();
    let mut opts = OptionMap::from_defaults(descriptors.iter().copied());

    // Response files first, in order; the command line overrides them.
    if let Some(files) = matches.get_many::<String>("response-file") {
        for path in files {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("cli.response_file: skipping {path}: {err}");
                    continue;
                }
            };
            for (name, raw) in parse_config_file(path, &text)? {
                opts.set_parsed(&name, &raw)?;
            }
        }
    }

    for descriptor in &descriptors {
        if let Some(raw) = matches.get_one::<String>(&descriptor.name) {
            opts.set_parsed(&descriptor.name, raw)?;
        }
    }

    Ok(Parsed::Run(opts))
}

#[cfg(test)]
mod tests {
    use super::{CliError, Parsed, parse, parse_config_file, preprocess};
    use harness::factory::{FactoryRegistry, NFactory};
    use harness::options::OptionError;
    use harness::output::DisplayOptions;
    use harness::setup::SetupRegistry;
    use std::io::Write as _;

    fn registries() -> (SetupRegistry, FactoryRegistry) {
        let mut setups = SetupRegistry::new("Setup");
        setups.register("Display", Box::new(DisplayOptions)).unwrap();
        let mut factories = FactoryRegistry::new("Runners");
        factories
            .register(
                "Update",
                Box::new(NFactory::new("updates", vec![], |_opts, _i| {
                    unreachable!("tests never generate runners")
                })),
            )
            .unwrap();
        (setups, factories)
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("docstress").chain(list.iter().copied()).map(str::to_owned).collect()
    }

    fn parse_ok(list: &[&str]) -> harness::OptionMap {
        let (setups, factories) = registries();
        match parse(args(list), &setups, &factories).unwrap() {
            Parsed::Run(opts) => opts,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    // CLI-T01: @file arguments become response-file options; the program
    // name is never rewritten.
    #[test]
    fn at_arguments_are_rewritten() {
        let processed = preprocess(args(&["@stress.cnf", "--verbose"]));
        assert_eq!(processed[1], "--response-file=stress.cnf");
        assert_eq!(processed[2], "--verbose");

        let untouched = preprocess(vec!["@odd-program-name".to_owned()]);
        assert_eq!(untouched[0], "@odd-program-name");
    }

    // CLI-T02: defaults flow through; command-line values override them.
    #[test]
    fn command_line_overrides_defaults() {
        let opts = parse_ok(&[]);
        assert_eq!(opts.get_u64("updates.threads").unwrap(), 0);
        assert!(opts.get_bool("pad-output").unwrap());

        let opts = parse_ok(&["--updates.threads=8", "--pad-output", "off"]);
        assert_eq!(opts.get_u64("updates.threads").unwrap(), 8);
        assert!(!opts.get_bool("pad-output").unwrap());
    }

    // CLI-T03: unknown options and malformed values are usage errors.
    #[test]
    fn rejects_unknown_and_malformed() {
        let (setups, factories) = registries();
        let err = parse(args(&["--no-such-option=1"]), &setups, &factories).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));

        let err = parse(args(&["--updates.threads=lots"]), &setups, &factories).unwrap_err();
        assert!(matches!(err, CliError::BadOption(OptionError::BadValue { .. })));
    }

    // CLI-T04: response files parse sections and comments; the command
    // line wins over files.
    #[test]
    fn response_file_precedence() {
        let path = std::env::temp_dir().join(format!("docstress-cli-{}.cnf", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "# stress profile").unwrap();
            writeln!(file, "pad-output = off").unwrap();
            writeln!(file, "[updates]").unwrap();
            writeln!(file, "threads = 4").unwrap();
        }
        let path_str = path.to_string_lossy().into_owned();

        let at_arg = format!("@{path_str}");
        let opts = parse_ok(&[at_arg.as_str()]);
        assert!(!opts.get_bool("pad-output").unwrap());
        assert_eq!(opts.get_u64("updates.threads").unwrap(), 4);

        let opts = parse_ok(&[at_arg.as_str(), "--updates.threads=9"]);
        assert_eq!(opts.get_u64("updates.threads").unwrap(), 9, "command line must win");

        let _ = std::fs::remove_file(&path);
    }

    // CLI-T05: malformed config lines name the file and line.
    #[test]
    fn malformed_config_line() {
        let err = parse_config_file("test.cnf", "pad-output off\n").unwrap_err();
        match err {
            CliError::Config { path, line } => {
                assert_eq!(path, "test.cnf");
                assert_eq!(line, "pad-output off");
            }
            other => panic!("expected Config error, got {other:?}"),
        }

        let pairs =
            parse_config_file("test.cnf", "[updates]\nthreads = 2 # inline comment\n").unwrap();
        assert_eq!(pairs, vec![("updates.threads".to_owned(), "2".to_owned())]);
    }

    // CLI-T06: unknown keys inside a response file are bad options.
    #[test]
    fn unknown_key_in_response_file() {
        let path =
            std::env::temp_dir().join(format!("docstress-cli-bad-{}.cnf", std::process::id()));
        std::fs::write(&path, "mystery-knob = 1\n").unwrap();
        let at_arg = format!("@{}", path.to_string_lossy());

        let (setups, factories) = registries();
        let err = parse(args(&[at_arg.as_str()]), &setups, &factories).unwrap_err();
        assert!(matches!(err, CliError::BadOption(OptionError::Unknown { .. })));

        let _ = std::fs::remove_file(&path);
    }
}
