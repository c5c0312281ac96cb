// Rust guideline compliant 2026-03-04

//! Concrete workloads for the document-store stress tool.
//!
//! Everything here implements the harness contracts against the
//! `domain::DocumentStore` port: the fill pipeline (a generator/loader
//! runner pair per collection, seeded by [`fill::FillSetup`]) and the
//! stress runners (point query, range query, in-place update), each
//! contributed through an N-factory keyed on `<section>.threads`.
//!
//! Entry point: [`register`], which adds every workload to the two
//! process registries during init.

pub mod docgen;
pub mod fill;
pub mod profile;
pub mod query;
pub mod update;
pub mod watchdog;

use std::sync::Arc;

use domain::DocumentStore;
use harness::factory::FactoryRegistry;
use harness::registry::RegistryError;
use harness::setup::SetupRegistry;

pub use profile::StoreProfile;
pub use watchdog::Watchdog;

/// Register every workload with the process registries.
///
/// Called once during init, before options are parsed; the registries are
/// read-only afterwards. The store handle is cloned into each factory so
/// runners can be built at generation time.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyRegistered`] if a workload name is
/// already taken; registration conflicts are fatal at startup.
pub fn register<S: DocumentStore + 'static>(
    store: &Arc<S>,
    setups: &mut SetupRegistry,
    factories: &mut FactoryRegistry,
) -> Result<(), RegistryError> {
    setups.register("Store", Box::new(fill::FillSetup::new(Arc::clone(store))))?;
    factories.register("Update", Box::new(update::factory(Arc::clone(store))))?;
    factories.register("PointQuery", Box::new(query::point_factory(Arc::clone(store))))?;
    factories.register("RangeQuery", Box::new(query::range_factory(Arc::clone(store))))?;
    Ok(())
}
