// Rust guideline compliant 2026-03-02

//! Name-keyed registries of factories and setups.
//!
//! A [`Registry`] owns its entries and iterates them in stable name order.
//! Registration happens during program init, before any worker exists;
//! afterwards registries are read-only. Duplicate names fail fast with
//! [`RegistryError::AlreadyRegistered`] and leave no partial state.

use std::collections::BTreeMap;

use crate::options::{Configurable, OptionDescriptor};

/// Errors raised while populating a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A second entry tried to claim an existing name.
    #[error("already registered plugin with name {name}")]
    AlreadyRegistered {
        /// The contested name.
        name: String,
    },
}

/// One entry's merged help section: its registry name plus its options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    /// Registry name of the entry that defined these options.
    pub title: String,
    /// The entry's option descriptors, in declaration order.
    pub options: Vec<OptionDescriptor>,
}

/// Name-keyed collection of configurable entries.
#[derive(Debug)]
pub struct Registry<E: ?Sized> {
    title: &'static str,
    entries: BTreeMap<String, Box<E>>,
}

impl<E: Configurable + ?Sized> Registry<E> {
    /// Create an empty registry titled `title` (shown in help output).
    #[must_use]
    pub fn new(title: &'static str) -> Self {
        Self { title, entries: BTreeMap::new() }
    }

    /// Registry title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Add `entry` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] when `name` is taken;
    /// the existing entry is untouched and the new one is dropped.
    pub fn register(&mut self, name: impl Into<String>, entry: Box<E>) -> Result<(), RegistryError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Merge every entry's option surface, in stable name order.
    #[must_use]
    pub fn all_options(&self) -> Vec<OptionGroup> {
        self.entries
            .iter()
            .map(|(name, entry)| OptionGroup { title: name.clone(), options: entry.options() })
            .collect()
    }

    /// Iterate entries in stable name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), &**entry))
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
