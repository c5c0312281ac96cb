// Rust guideline compliant 2026-03-04

//! In-place update workload.
//!
//! Each step picks a uniform random key and increments random fields of
//! the first matching document. A miss (no document with that key) is a
//! successful step; the store did its work.

use std::sync::{Arc, Mutex, PoisonError};

use domain::DocumentStore;
use harness::factory::NFactory;
use harness::options::{OptionError, OptionMap};
use harness::runner::{Runner, RunnerStats, StepError};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::docgen;
use crate::profile::StoreProfile;
use crate::watchdog::Watchdog;

/// Runner incrementing random fields of one random document per step.
pub struct UpdateRunner<S> {
    name: String,
    stats: RunnerStats,
    store: Arc<S>,
    ns: String,
    profile: StoreProfile,
    watchdog: Watchdog,
    rng: Mutex<StdRng>,
}

impl<S: DocumentStore> UpdateRunner<S> {
    fn new(store: Arc<S>, profile: StoreProfile, idx: usize) -> Self {
        Self {
            name: format!("update{idx}"),
            stats: RunnerStats::new(),
            ns: profile.ns(idx),
            watchdog: Watchdog::from_threshold_secs(profile.alarm_threshold),
            store,
            profile,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl<S: DocumentStore> Runner for UpdateRunner<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    fn step(&self) -> Result<(), StepError> {
        let (key, deltas) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (self.profile.random_key(&mut rng), docgen::random_fields(&mut rng, &self.profile))
        };
        let modified = self
            .watchdog
            .observe("update", || self.store.update_one(&self.ns, key, &deltas))
            .map_err(StepError::failed)?;
        if modified == 0 {
            log::debug!("{}: no document with key {key}", self.name);
        }
        Ok(())
    }
}

impl<S> std::fmt::Debug for UpdateRunner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRunner").field("name", &self.name).field("ns", &self.ns).finish_non_exhaustive()
    }
}

/// The `updates` N-factory.
pub fn factory<S: DocumentStore + 'static>(
    store: Arc<S>,
) -> NFactory<impl Fn(&OptionMap, usize) -> Result<Arc<dyn Runner>, OptionError> + Send + Sync> {
    NFactory::new("updates", vec![], move |opts, i| {
        let profile = StoreProfile::from_options(opts)?;
        Ok(Arc::new(UpdateRunner::new(Arc::clone(&store), profile, i)) as Arc<dyn Runner>)
    })
}

#[cfg(test)]
mod tests {
    use super::factory;
    use domain::{Document, DocumentStore, IndexSpec, StoreError};
    use harness::factory::Factory as _;
    use harness::interrupt::Interrupter;
    use harness::options::{Configurable as _, OptionMap};
    use harness::runner::Runner;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Default)]
    struct RecordingStore {
        updates: AtomicU64,
    }

    impl DocumentStore for RecordingStore {
        fn drop_collection(&self, _ns: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn insert(&self, _ns: &str, _docs: Vec<Document>) -> Result<(), StoreError> {
            Ok(())
        }

        fn ensure_index(&self, _ns: &str, _spec: &IndexSpec) -> Result<(), StoreError> {
            Ok(())
        }

        fn update_one(
            &self,
            _ns: &str,
            key: i64,
            deltas: &BTreeMap<String, i64>,
        ) -> Result<u64, StoreError> {
            assert!((0..100).contains(&key), "key {key} outside the populated range");
            assert!(!deltas.is_empty(), "updates must carry at least one increment");
            self.updates.fetch_add(1, Ordering::Relaxed);
            Ok(1)
        }

        fn find_by_key(&self, _ns: &str, _key: i64) -> Result<Vec<Document>, StoreError> {
            Ok(vec![])
        }

        fn scan_range(&self, _ns: &str, _lo: i64, _hi: i64) -> Result<Vec<Document>, StoreError> {
            Ok(vec![])
        }
    }

    fn opts_with(factory_opts: &[harness::OptionDescriptor], pairs: &[(&str, &str)]) -> OptionMap {
        let mut descriptors = crate::profile::StoreProfile::options();
        descriptors.extend_from_slice(factory_opts);
        let mut opts = OptionMap::from_defaults(&descriptors);
        for (name, value) in pairs {
            opts.set_parsed(name, value).unwrap();
        }
        opts
    }

    // U-T01: generated runners target distinct collections round-robin
    // and drive the store on every step.
    #[test]
    fn update_runner_steps_the_store() {
        let store = Arc::new(RecordingStore::default());
        let factory = factory(Arc::clone(&store));
        let opts = opts_with(
            &factory.options(),
            &[
                ("updates.threads", "2"),
                ("store.documents", "100"),
                ("store.collections", "2"),
            ],
        );

        let mut runners = Vec::new();
        factory.generate(&opts, &mut runners).unwrap();
        assert_eq!(runners.len(), 2);
        assert_eq!(runners[0].name(), "update0");
        assert_eq!(runners[1].name(), "update1");

        for runner in &runners {
            for _ in 0..10 {
                runner.step().unwrap();
            }
        }
        assert_eq!(store.updates.load(Ordering::Relaxed), 20);
    }

    // U-T02: a runner stepping a dead backend keeps running under the
    // loop's transient-error policy (the step itself reports failure).
    #[test]
    fn backend_error_is_transient() {
        #[derive(Debug)]
        struct DeadStore;
        impl DocumentStore for DeadStore {
            fn drop_collection(&self, _ns: &str) -> Result<(), StoreError> {
                Ok(())
            }
            fn insert(&self, _ns: &str, _docs: Vec<Document>) -> Result<(), StoreError> {
                Ok(())
            }
            fn ensure_index(&self, _ns: &str, _spec: &IndexSpec) -> Result<(), StoreError> {
                Ok(())
            }
            fn update_one(
                &self,
                _ns: &str,
                _key: i64,
                _deltas: &BTreeMap<String, i64>,
            ) -> Result<u64, StoreError> {
                Err(StoreError::Backend { reason: "gone".to_owned() })
            }
            fn find_by_key(&self, _ns: &str, _key: i64) -> Result<Vec<Document>, StoreError> {
                Ok(vec![])
            }
            fn scan_range(&self, _ns: &str, _lo: i64, _hi: i64) -> Result<Vec<Document>, StoreError> {
                Ok(vec![])
            }
        }

        let factory = factory(Arc::new(DeadStore));
        let opts = opts_with(&factory.options(), &[("updates.threads", "1")]);
        let mut runners = Vec::new();
        factory.generate(&opts, &mut runners).unwrap();

        let runner = Arc::clone(&runners[0]);
        let worker = std::thread::spawn(move || runner.run(&Interrupter::new()));
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert!(runners[0].is_running(), "failing steps must not stop the runner");
        assert_eq!(runners[0].stats().steps().value(), 0, "failed steps are not counted");
        runners[0].stop();
        worker.join().expect("worker thread");
    }
}
