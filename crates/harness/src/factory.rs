// Rust guideline compliant 2026-03-02

//! Runner factories.
//!
//! A [`Factory`] turns the parsed option map into zero or more runners.
//! Most workloads want N identical runners controlled by a
//! `<section>.threads` option; [`NFactory`] implements that shape around a
//! `make(opts, i)` hook, so a workload contributes itself with one closure
//! and (optionally) some extra option descriptors.

use std::sync::Arc;

use crate::options::{Configurable, OptionDescriptor, OptionError, OptionMap, OptionValue};
use crate::registry::Registry;
use crate::runner::Runner;

/// The registry workload factories live in.
pub type FactoryRegistry = Registry<dyn Factory>;

/// Produces runners from configuration.
pub trait Factory: Configurable + Send + Sync {
    /// CLI section prefixing this factory's options (`updates`,
    /// `point-queries`, ...).
    fn cli_section(&self) -> &str;

    /// Append this factory's runners to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] when a required option is missing or
    /// mistyped.
    fn generate(&self, opts: &OptionMap, out: &mut Vec<Arc<dyn Runner>>) -> Result<(), OptionError>;
}

impl Registry<dyn Factory> {
    /// Generate the runners of every registered factory, in stable order.
    ///
    /// # Errors
    ///
    /// Propagates the first factory's [`OptionError`].
    pub fn generate_all(
        &self,
        opts: &OptionMap,
        out: &mut Vec<Arc<dyn Runner>>,
    ) -> Result<(), OptionError> {
        for (_, factory) in self.entries() {
            factory.generate(opts, out)?;
        }
        Ok(())
    }
}

/// Descriptor for a section's worker-count option.
#[must_use]
pub fn threads_option(section: &str) -> OptionDescriptor {
    OptionDescriptor::new(format!("{section}.threads"), "# of threads.", OptionValue::Uint(0))
}

/// Factory producing `<section>.threads` identical runners through a
/// `make(opts, i)` hook.
pub struct NFactory<F> {
    section: String,
    extra_options: Vec<OptionDescriptor>,
    make: F,
}

impl<F> NFactory<F>
where
    F: Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync,
{
    /// Create a factory for `section` with extra options beyond
    /// `<section>.threads`.
    #[must_use]
    pub fn new(section: impl Into<String>, extra_options: Vec<OptionDescriptor>, make: F) -> Self {
        Self { section: section.into(), extra_options, make }
    }
}

impl<F> Configurable for NFactory<F>
where
    F: Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync,
{
    fn options(&self) -> Vec<OptionDescriptor> {
        let mut options = vec![threads_option(&self.section)];
        options.extend(self.extra_options.iter().cloned());
        options
    }
}

impl<F> Factory for NFactory<F>
where
    F: Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync,
{
    fn cli_section(&self) -> &str {
        &self.section
    }

    fn generate(&self, opts: &OptionMap, out: &mut Vec<Arc<dyn Runner>>) -> Result<(), OptionError> {
        let threads = opts.get_u64(&format!("{}.threads", self.section))?;
        for i in 0..usize::try_from(threads).unwrap_or(usize::MAX) {
            out.push((self.make)(opts, i)?);
        }
        Ok(())
    }
}

impl<F> std::fmt::Debug for NFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NFactory").field("section", &self.section).finish_non_exhaustive()
    }
}
