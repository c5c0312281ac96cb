// Rust guideline compliant 2026-03-04

//! Read workloads: point lookups and range scans.
//!
//! A point query fetches every document with one random key and walks the
//! result. A range scan reads a `[x, x+stride)` key window; the stride is
//! its own option so scan weight can be tuned independently of the data
//! set size.

use std::sync::{Arc, Mutex, PoisonError};

use domain::DocumentStore;
use harness::factory::NFactory;
use harness::options::{OptionDescriptor, OptionError, OptionMap, OptionValue};
use harness::runner::{Runner, RunnerStats, StepError};
use rand::Rng as _;
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::profile::StoreProfile;
use crate::watchdog::Watchdog;

/// Runner reading all documents for one random key per step.
pub struct PointQueryRunner<S> {
    name: String,
    stats: RunnerStats,
    store: Arc<S>,
    ns: String,
    profile: StoreProfile,
    watchdog: Watchdog,
    rng: Mutex<StdRng>,
}

impl<S: DocumentStore> PointQueryRunner<S> {
    fn new(store: Arc<S>, profile: StoreProfile, idx: usize) -> Self {
        Self {
            name: format!("ptquery{idx}"),
            stats: RunnerStats::new(),
            ns: profile.ns(idx),
            watchdog: Watchdog::from_threshold_secs(profile.alarm_threshold),
            store,
            profile,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl<S: DocumentStore> Runner for PointQueryRunner<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    fn step(&self) -> Result<(), StepError> {
        let key = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.profile.random_key(&mut rng)
        };
        let docs = self
            .watchdog
            .observe("point-query", || self.store.find_by_key(&self.ns, key))
            .map_err(StepError::failed)?;
        log::trace!("{}: key={key} hits={}", self.name, docs.len());
        Ok(())
    }
}

impl<S> std::fmt::Debug for PointQueryRunner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointQueryRunner")
            .field("name", &self.name)
            .field("ns", &self.ns)
            .finish_non_exhaustive()
    }
}

/// Runner scanning a fixed-width key window per step.
pub struct RangeQueryRunner<S> {
    name: String,
    stats: RunnerStats,
    store: Arc<S>,
    ns: String,
    profile: StoreProfile,
    stride: u64,
    watchdog: Watchdog,
    rng: Mutex<StdRng>,
}

impl<S: DocumentStore> RangeQueryRunner<S> {
    fn new(store: Arc<S>, profile: StoreProfile, stride: u64, idx: usize) -> Self {
        Self {
            name: format!("range{idx}"),
            stats: RunnerStats::new(),
            ns: profile.ns(idx),
            watchdog: Watchdog::from_threshold_secs(profile.alarm_threshold),
            store,
            profile,
            stride,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl<S: DocumentStore> Runner for RangeQueryRunner<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    fn step(&self) -> Result<(), StepError> {
        // Window start is uniform over the keys that leave a full stride
        // before the end of the populated range.
        let span = self.profile.documents.saturating_sub(self.stride).max(1);
        let lo = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            i64::try_from(rng.random_range(0..span)).unwrap_or(i64::MAX)
        };
        let hi = lo.saturating_add(i64::try_from(self.stride).unwrap_or(i64::MAX));
        let docs = self
            .watchdog
            .observe("range-query", || self.store.scan_range(&self.ns, lo, hi))
            .map_err(StepError::failed)?;
        log::trace!("{}: lo={lo} hi={hi} hits={}", self.name, docs.len());
        Ok(())
    }
}

impl<S> std::fmt::Debug for RangeQueryRunner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeQueryRunner")
            .field("name", &self.name)
            .field("ns", &self.ns)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

/// The `point-queries` N-factory.
pub fn point_factory<S: DocumentStore + 'static>(
    store: Arc<S>,
) -> NFactory<impl Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync> {
    NFactory::new("point-queries", vec![], move |opts, i| {
        let profile = StoreProfile::from_options(opts)?;
        Ok(Arc::new(PointQueryRunner::new(Arc::clone(&store), profile, i)) as Arc<dyn Runner>)
    })
}

/// The `range-queries` N-factory.
pub fn range_factory<S: DocumentStore + 'static>(
    store: Arc<S>,
) -> NFactory<impl Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync> {
    NFactory::new(
        "range-queries",
        vec![OptionDescriptor::new(
            "range-queries.stride",
            "keys spanned by one range scan",
            OptionValue::Uint(1000),
        )],
        move |opts, i| {
            let profile = StoreProfile::from_options(opts)?;
            let stride = opts.get_u64("range-queries.stride")?;
            Ok(Arc::new(RangeQueryRunner::new(Arc::clone(&store), profile, stride, i))
                as Arc<dyn Runner>)
        },
    )
}
