// Rust guideline compliant 2026-03-04

//! Collection fill pipeline: a generator/loader runner pair per collection.
//!
//! [`FillSetup`] drops the target collections in its one-shot hook (unless
//! `store.keep-database` is set), then seeds one [`Generator`] and one
//! [`Loader`] per collection, joined by a bounded batch queue. The
//! generator fabricates document batches and suppresses its own reporting;
//! the loader drains the queue into the store, counts loaded documents in
//! its own counter, and finishes the collection (secondary index, bulk
//! commit) before stopping.
//!
//! Shutdown protocol: the queue is not an interruption point, so each half
//! unparks the other through its `finish` hook -- the loader drains (a
//! parked generator resumes), the generator pushes one empty nudge batch
//! (a parked loader resumes). A loader that stops early (insert error)
//! also raises the shared halt flag so its generator stops at the next
//! step instead of refilling the queue forever.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use domain::{Document, DocumentStore, IndexOrder, IndexSpec, KEY_FIELD};
use harness::options::{Configurable, OptionDescriptor, OptionMap, OptionValue};
use harness::output::{NAME_WIDTH, Style};
use harness::queue::BatchQueue;
use harness::runner::{Runner, RunnerStats, StepError};
use harness::setup::{Setup, SetupError};
use harness::{Counter, Timestamp, clock};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::docgen;
use crate::profile::StoreProfile;

/// Batches in flight between a generator and its loader.
const LOADER_QUEUE_DEPTH: usize = 5;

type Batch = Vec<Document>;

/// The secondary index the `n`th loader creates, derived from the bits of
/// `n`: bit 0 directs the anchor field `a`, each further bit adds one more
/// field with its direction.
fn index_spec(n: usize) -> IndexSpec {
    fn direction(bit: usize) -> (IndexOrder, &'static str) {
        if bit & 1 == 1 { (IndexOrder::Descending, "-1") } else { (IndexOrder::Ascending, "1") }
    }

    let (order, tag) = direction(n);
    let mut keys = vec![(KEY_FIELD.to_owned(), order)];
    let mut name = format!("{KEY_FIELD}_{tag}");
    let mut bits = n >> 1;
    let mut idx = 1;
    while bits > 0 {
        let field = docgen::field_name(idx);
        let (order, tag) = direction(bits);
        name.push('_');
        name.push_str(&field);
        name.push('_');
        name.push_str(tag);
        keys.push((field, order));
        idx += 1;
        bits >>= 1;
    }
    IndexSpec { name, keys }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Fabricates random document batches into the pair's queue, then stops.
///
/// Internal runner: its rows are suppressed so only the loader's progress
/// shows in the table.
#[derive(Debug)]
pub struct Generator {
    name: String,
    stats: RunnerStats,
    profile: StoreProfile,
    batch_size: u64,
    generated: AtomicU64,
    queue: Arc<BatchQueue<Batch>>,
    halt: Arc<AtomicBool>,
    rng: Mutex<StdRng>,
}

impl Generator {
    fn new(
        idx: usize,
        profile: StoreProfile,
        batch_size: u64,
        queue: Arc<BatchQueue<Batch>>,
        halt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: format!("gen{idx}"),
            stats: RunnerStats::new(),
            profile,
            batch_size,
            generated: AtomicU64::new(0),
            queue,
            halt,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl Runner for Generator {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    fn step(&self) -> Result<(), StepError> {
        if self.halt.load(Ordering::SeqCst) {
            self.stop();
            return Ok(());
        }
        let generated = self.generated.load(Ordering::Relaxed);
        if generated >= self.profile.documents {
            self.stop();
            return Ok(());
        }

        let count = self.batch_size.max(1).min(self.profile.documents - generated);
        let batch: Batch = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (0..count).map(|_| docgen::random_document(&mut rng, &self.profile)).collect()
        };
        self.queue.push(batch);

        let total = generated + count;
        self.generated.store(total, Ordering::Relaxed);
        if total >= self.profile.documents {
            self.stop();
        }
        Ok(())
    }

    /// One empty nudge batch so a loader parked on an empty queue wakes
    /// up and notices it should stop. Never deadlocks: a parked loader
    /// means the queue is empty.
    fn finish(&self) {
        self.queue.push(Batch::new());
    }

    fn report(&self, _ti: Timestamp, _style: &Style, _out: &mut String) -> usize {
        0
    }

    fn total(&self, _ti: Timestamp, _style: &Style, _out: &mut String) {}
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Drains document batches into the store; finishes the collection and
/// stops once the configured document count has landed.
pub struct Loader<S> {
    name: String,
    stats: RunnerStats,
    store: Arc<S>,
    ns: String,
    idx: usize,
    total_docs: u64,
    loaded: Counter,
    queue: Arc<BatchQueue<Batch>>,
    halt: Arc<AtomicBool>,
}

impl<S: DocumentStore> Loader<S> {
    fn new(
        idx: usize,
        ns: String,
        total_docs: u64,
        store: Arc<S>,
        queue: Arc<BatchQueue<Batch>>,
        halt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: format!("load{idx}"),
            stats: RunnerStats::new(),
            store,
            ns,
            idx,
            total_docs,
            loaded: Counter::new(clock::now()),
            queue,
            halt,
        }
    }

    /// Index creation and bulk commit; once begun this runs to
    /// completion, interrupts are observed only afterwards.
    fn finish_collection(&self) {
        if let Err(err) = self.store.ensure_index(&self.ns, &index_spec(self.idx)) {
            log::error!("{}: error creating index: {err}", self.name);
        }
        if let Err(err) = self.store.commit(&self.ns) {
            log::error!("{}: error committing load: {err}", self.name);
        }
    }
}

impl<S: DocumentStore> Runner for Loader<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    fn step(&self) -> Result<(), StepError> {
        if self.loaded.value() >= self.total_docs {
            // Degenerate profiles (zero documents) finish without a batch
            // and without a collection to index.
            self.queue.drain();
            if self.total_docs > 0 {
                self.finish_collection();
            }
            self.halt.store(true, Ordering::SeqCst);
            self.stop();
            return Ok(());
        }

        let batch = self.queue.pop();
        if batch.is_empty() {
            // Nudge from a stopping generator; re-check on the next step.
            return Ok(());
        }

        let count = batch.len() as u64;
        match self.store.insert(&self.ns, batch) {
            Ok(()) => {
                log::debug!("{}: inserted batch: size={count}", self.name);
                self.loaded.add(count);
            }
            Err(err) => {
                // Handled inside the step: an unloadable collection stops
                // this pair, not the whole run.
                log::error!("{}: error inserting batch: {err}", self.name);
                self.halt.store(true, Ordering::SeqCst);
                self.stop();
                return Ok(());
            }
        }

        if self.loaded.value() >= self.total_docs {
            self.queue.drain();
            self.finish_collection();
            self.halt.store(true, Ordering::SeqCst);
            self.stop();
        }
        Ok(())
    }

    /// Drain so a generator parked on a full queue resumes and notices
    /// the halt flag.
    fn finish(&self) {
        self.queue.drain();
    }

    fn report(&self, ti: Timestamp, style: &Style, out: &mut String) -> usize {
        out.push_str(&style.pad(&self.name, NAME_WIDTH));
        out.push_str(&style.ofs);
        out.push_str(&self.loaded.report(ti).render(style));
        out.push_str(&style.ors);
        1
    }

    fn total(&self, ti: Timestamp, style: &Style, out: &mut String) {
        out.push_str(&style.pad(&self.name, NAME_WIDTH));
        out.push_str(&style.ofs);
        out.push_str(&self.loaded.total(ti).render(style));
        out.push_str(&style.ors);
    }
}

impl<S> std::fmt::Debug for Loader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("name", &self.name)
            .field("ns", &self.ns)
            .field("total_docs", &self.total_docs)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// FillSetup
// ---------------------------------------------------------------------------

/// Setup entry owning the `store.*` options and the fill pipeline.
pub struct FillSetup<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> FillSetup<S> {
    /// Create the setup entry over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: DocumentStore> Configurable for FillSetup<S> {
    fn options(&self) -> Vec<OptionDescriptor> {
        let mut options = StoreProfile::options();
        options.push(OptionDescriptor::new(
            "store.loader-batchsize",
            "batch size for the loader",
            OptionValue::Uint(1000),
        ));
        options.push(OptionDescriptor::new(
            "store.keep-database",
            "keep the old database intact",
            OptionValue::Bool(false),
        ));
        options.push(OptionDescriptor::new(
            "store.create",
            "seed the database with freshly loaded data",
            OptionValue::Bool(true),
        ));
        options
    }
}

impl<S: DocumentStore + 'static> Setup for FillSetup<S> {
    fn setup(&self, opts: &OptionMap) -> Result<(), SetupError> {
        if opts.get_bool("store.keep-database")? {
            return Ok(());
        }
        let profile = StoreProfile::from_options(opts)?;
        for i in 0..profile.collections {
            let ns = profile.ns(i);
            log::debug!("fill.drop: ns={ns}");
            self.store.drop_collection(&ns).map_err(SetupError::failed)?;
        }
        Ok(())
    }

    fn generate_setup_runners(
        &self,
        opts: &OptionMap,
        out: &mut Vec<Arc<dyn Runner>>,
    ) -> Result<(), SetupError> {
        if !opts.get_bool("store.create")? {
            return Ok(());
        }
        let profile = StoreProfile::from_options(opts)?;
        let batch_size = opts.get_u64("store.loader-batchsize")?;
        for i in 0..profile.collections {
            let queue = Arc::new(BatchQueue::new(LOADER_QUEUE_DEPTH));
            let halt = Arc::new(AtomicBool::new(false));
            out.push(Arc::new(Generator::new(
                i,
                profile.clone(),
                batch_size,
                Arc::clone(&queue),
                Arc::clone(&halt),
            )));
            out.push(Arc::new(Loader::new(
                i,
                profile.ns(i),
                profile.documents,
                Arc::clone(&self.store),
                queue,
                halt,
            )));
        }
        Ok(())
    }
}

impl<S> std::fmt::Debug for FillSetup<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillSetup").finish_non_exhaustive()
    }
}
