// Rust guideline compliant 2026-03-02

//! Output formatting: separators, padding, and the display option surface.
//!
//! A [`Style`] carries the field/record separators and the padding switch.
//! Header and data rows go through the same padding helpers so columns
//! align. [`DisplayOptions`] is the setup-registry entry that only defines
//! options; it performs no setup work of its own.

use crate::options::{Configurable, OptionDescriptor, OptionError, OptionMap, OptionValue};
use crate::setup::Setup;

/// Width of integer columns (operation counts).
pub const INT_WIDTH: usize = 10;
/// Width of fixed-point columns, excluding the `s` / `/s` unit suffix.
pub const FLOAT_WIDTH: usize = 14;
/// Width of the runner-name column in data rows.
pub const NAME_WIDTH: usize = 10;
/// Width of the name column in header rows; the leading `# ` makes up the
/// difference so headers align with data rows.
pub const HEADER_NAME_WIDTH: usize = 8;

/// Field/record separators and the column padding switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Pad fields into fixed-width columns.
    pub pad_output: bool,
    /// Output field separator.
    pub ofs: String,
    /// Output record separator.
    pub ors: String,
}

impl Default for Style {
    fn default() -> Self {
        Self { pad_output: true, ofs: "\t".to_owned(), ors: "\n".to_owned() }
    }
}

impl Style {
    /// Build a style from parsed options.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] when a display option is missing from `opts`
    /// or carries the wrong type.
    pub fn from_options(opts: &OptionMap) -> Result<Self, OptionError> {
        Ok(Self {
            pad_output: opts.get_bool("pad-output")?,
            ofs: opts.get_str("ofs")?.to_owned(),
            ors: opts.get_str("ors")?.to_owned(),
        })
    }

    /// Right-pad `text` to `width` when padding is on, else pass through.
    #[must_use]
    pub fn pad(&self, text: &str, width: usize) -> String {
        if self.pad_output { format!("{text:>width$}") } else { text.to_owned() }
    }

    /// Format an operation count column.
    #[must_use]
    pub fn int(&self, value: u64) -> String {
        self.pad(&value.to_string(), INT_WIDTH)
    }

    /// Format a seconds column, `s`-suffixed.
    #[must_use]
    pub fn secs(&self, value: f64) -> String {
        let mut field = self.pad(&format!("{value:.4}"), FLOAT_WIDTH);
        field.push('s');
        field
    }

    /// Format a rate column, `/s`-suffixed.
    #[must_use]
    pub fn rate(&self, value: f64) -> String {
        let mut field = self.pad(&format!("{value:.4}"), FLOAT_WIDTH);
        field.push_str("/s");
        field
    }

    /// Join fields with the field separator and terminate the record.
    #[must_use]
    pub fn row(&self, fields: &[String]) -> String {
        let mut line = fields.join(&self.ofs);
        line.push_str(&self.ors);
        line
    }
}

/// Setup-registry entry that defines the display options.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions;

impl Configurable for DisplayOptions {
    fn options(&self) -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::new(
                "pad-output",
                "Pad output fields into columns.",
                OptionValue::Bool(true),
            ),
            OptionDescriptor::new("ofs", "Output field separator.", OptionValue::Str("\t".to_owned())),
            OptionDescriptor::new("ors", "Output record separator.", OptionValue::Str("\n".to_owned())),
            OptionDescriptor::new(
                "output-period",
                "Seconds between output.",
                OptionValue::Float(1.0),
            ),
            OptionDescriptor::new(
                "header-period",
                "Lines between printing headers; 0 or negative prints one header only.",
                OptionValue::Int(20),
            ),
        ]
    }
}

impl Setup for DisplayOptions {}
