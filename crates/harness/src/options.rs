// Rust guideline compliant 2026-03-02

//! Option descriptors and the parsed option map.
//!
//! Every component that wants configuration exposes a [`Configurable`]
//! surface: a list of [`OptionDescriptor`]s naming its options, their help
//! text, and their typed defaults. The registries merge those surfaces for
//! `--help`; the CLI layer parses raw values against them into one
//! [`OptionMap`] that factories and setups read at generation time. The
//! map is built once during startup and read-only afterwards.

use std::collections::BTreeMap;

/// Typed option value; the default's variant fixes the option's type.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Boolean; accepts `true/false`, `1/0`, `on/off`, `yes/no`.
    Bool(bool),
    /// Unsigned count.
    Uint(u64),
    /// Signed count (used where negative values are meaningful, e.g.
    /// `header-period`).
    Int(i64),
    /// Floating point (seconds, ratios).
    Float(f64),
    /// Free-form string.
    Str(String),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "unsigned integer",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// Parse `raw` as a value of the same type as `self`.
    fn reparse(&self, raw: &str) -> Result<Self, String> {
        match self {
            Self::Bool(_) => match raw {
                "true" | "1" | "on" | "yes" => Ok(Self::Bool(true)),
                "false" | "0" | "off" | "no" => Ok(Self::Bool(false)),
                other => Err(format!("`{other}` is not a bool")),
            },
            Self::Uint(_) => raw
                .parse::<u64>()
                .map(Self::Uint)
                .map_err(|e| format!("`{raw}` is not an unsigned integer: {e}")),
            Self::Int(_) => raw
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|e| format!("`{raw}` is not an integer: {e}")),
            Self::Float(_) => raw
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|e| format!("`{raw}` is not a float: {e}")),
            Self::Str(_) => Ok(Self::Str(raw.to_owned())),
        }
    }

    /// Default rendered for `--help`.
    #[must_use]
    pub fn render_default(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(v) => v.escape_default().to_string(),
        }
    }
}

/// One recognized option: name, help text, typed default.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    /// Full option name, possibly section-qualified (`updates.threads`).
    pub name: String,
    /// Help text shown by `--help`.
    pub help: String,
    /// Default value; also fixes the option's type.
    pub default: OptionValue,
}

impl OptionDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, help: impl Into<String>, default: OptionValue) -> Self {
        Self { name: name.into(), help: help.into(), default }
    }
}

/// Errors raised while assembling or reading the option map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// The option name is not part of any registered surface.
    #[error("unknown option: {name}")]
    Unknown {
        /// The unrecognized option name.
        name: String,
    },
    /// The raw value does not parse as the option's type, or a typed read
    /// asked for the wrong type.
    #[error("bad value for option {name}: {reason}")]
    BadValue {
        /// The offending option name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Name-keyed parsed option values.
#[derive(Debug, Clone, Default)]
pub struct OptionMap {
    values: BTreeMap<String, OptionValue>,
}

impl OptionMap {
    /// Seed a map with the defaults of every descriptor.
    #[must_use]
    pub fn from_defaults<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a OptionDescriptor>,
    {
        let values = descriptors
            .into_iter()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect();
        Self { values }
    }

    /// Overwrite `name` with `raw` parsed as the option's declared type.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] when no descriptor declared `name`;
    /// [`OptionError::BadValue`] when `raw` does not parse.
    pub fn set_parsed(&mut self, name: &str, raw: &str) -> Result<(), OptionError> {
        let current = self
            .values
            .get(name)
            .ok_or_else(|| OptionError::Unknown { name: name.to_owned() })?;
        let parsed = current
            .reparse(raw)
            .map_err(|reason| OptionError::BadValue { name: name.to_owned(), reason })?;
        self.values.insert(name.to_owned(), parsed);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&OptionValue, OptionError> {
        self.values
            .get(name)
            .ok_or_else(|| OptionError::Unknown { name: name.to_owned() })
    }

    fn type_mismatch(name: &str, want: &str, got: &OptionValue) -> OptionError {
        OptionError::BadValue {
            name: name.to_owned(),
            reason: format!("expected {want}, option is declared {}", got.type_name()),
        }
    }

    /// Read a bool option.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] or [`OptionError::BadValue`] on a type
    /// mismatch.
    pub fn get_bool(&self, name: &str) -> Result<bool, OptionError> {
        match self.get(name)? {
            OptionValue::Bool(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "bool", other)),
        }
    }

    /// Read an unsigned integer option.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] or [`OptionError::BadValue`] on a type
    /// mismatch.
    pub fn get_u64(&self, name: &str) -> Result<u64, OptionError> {
        match self.get(name)? {
            OptionValue::Uint(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "unsigned integer", other)),
        }
    }

    /// Read a signed integer option.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] or [`OptionError::BadValue`] on a type
    /// mismatch.
    pub fn get_i64(&self, name: &str) -> Result<i64, OptionError> {
        match self.get(name)? {
            OptionValue::Int(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "integer", other)),
        }
    }

    /// Read a float option.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] or [`OptionError::BadValue`] on a type
    /// mismatch.
    pub fn get_f64(&self, name: &str) -> Result<f64, OptionError> {
        match self.get(name)? {
            OptionValue::Float(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "float", other)),
        }
    }

    /// Read a string option.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] or [`OptionError::BadValue`] on a type
    /// mismatch.
    pub fn get_str(&self, name: &str) -> Result<&str, OptionError> {
        match self.get(name)? {
            OptionValue::Str(v) => Ok(v),
            other => Err(Self::type_mismatch(name, "string", other)),
        }
    }
}

/// A component that exposes an option surface.
pub trait Configurable {
    /// The options this component recognizes. Empty by default.
    fn options(&self) -> Vec<OptionDescriptor> {
        Vec::new()
    }
}
