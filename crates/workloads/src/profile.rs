// Rust guideline compliant 2026-03-04

//! Store profile: the shape of the synthetic data set.
//!
//! One parsed view of the `store.*` option section, shared by the fill
//! setup and every stress factory. Collections are namespaced
//! `<db><index>.coll`; runner `i` targets collection `i % collections`.

use harness::options::{OptionDescriptor, OptionError, OptionMap, OptionValue};
use rand::Rng;
use rand::rngs::StdRng;

/// Parsed `store.*` options.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreProfile {
    /// Database name prefix.
    pub db: String,
    /// Number of collections.
    pub collections: usize,
    /// Documents per collection.
    pub documents: u64,
    /// Integer fields per document.
    pub fields: usize,
    /// Padding bytes per document.
    pub padding: usize,
    /// Fraction of padding filled with zeroes, in `[0, 1]`.
    pub compressibility: f64,
    /// Seconds after which a single store operation logs a warning;
    /// zero disables the watchdog.
    pub alarm_threshold: f64,
}

impl StoreProfile {
    /// The `store.*` option descriptors.
    #[must_use]
    pub fn options() -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::new("store.db", "db name prefix to use", OptionValue::Str("docstress".to_owned())),
            OptionDescriptor::new("store.collections", "number of collections to use", OptionValue::Uint(4)),
            OptionDescriptor::new(
                "store.documents",
                "number of documents (per collection)",
                OptionValue::Uint(100_000),
            ),
            OptionDescriptor::new("store.fields", "number of fields per document", OptionValue::Uint(2)),
            OptionDescriptor::new("store.padding", "padding per document", OptionValue::Uint(100)),
            OptionDescriptor::new(
                "store.compressibility",
                "compressibility factor (0 = random padding, 1 = all zeroes)",
                OptionValue::Float(0.5),
            ),
            OptionDescriptor::new(
                "store.alarm-threshold",
                "warn when one store operation takes longer than this many seconds (0 = off)",
                OptionValue::Float(0.0),
            ),
        ]
    }

    /// Parse the profile out of the merged option map.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] when a `store.*` option is missing or
    /// mistyped.
    pub fn from_options(opts: &OptionMap) -> Result<Self, OptionError> {
        Ok(Self {
            db: opts.get_str("store.db")?.to_owned(),
            collections: usize::try_from(opts.get_u64("store.collections")?).unwrap_or(usize::MAX),
            documents: opts.get_u64("store.documents")?,
            fields: usize::try_from(opts.get_u64("store.fields")?).unwrap_or(usize::MAX),
            padding: usize::try_from(opts.get_u64("store.padding")?).unwrap_or(usize::MAX),
            compressibility: opts.get_f64("store.compressibility")?,
            alarm_threshold: opts.get_f64("store.alarm-threshold")?,
        })
    }

    /// Namespace of the collection runner `idx` targets.
    #[must_use]
    pub fn ns(&self, idx: usize) -> String {
        let collections = self.collections.max(1);
        format!("{}{}.coll", self.db, idx % collections)
    }

    /// A uniformly random key in the populated range.
    pub fn random_key(&self, rng: &mut StdRng) -> i64 {
        let bound = i64::try_from(self.documents.max(1)).unwrap_or(i64::MAX);
        rng.random_range(0..bound)
    }
}
