// Rust guideline compliant 2026-03-06

//! In-memory adapter for the `DocumentStore` port.
//!
//! Collections are created on first insert and keep a `BTreeMap` index on
//! the keyed field so point lookups and range scans do what a real
//! document store would do with its secondary index. Intended for
//! self-contained stress runs and tests; a networked backend would
//! implement the same port in its own adapter.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use domain::{Document, DocumentStore, IndexSpec, StoreError};

#[derive(Debug, Default)]
struct Collection {
    docs: Vec<Document>,
    /// Keyed-field value -> indices into `docs`, in insertion order.
    by_key: BTreeMap<i64, Vec<usize>>,
    indexes: Vec<IndexSpec>,
}

impl Collection {
    fn insert(&mut self, doc: Document) {
        let slot = self.docs.len();
        if let Some(key) = doc.key() {
            self.by_key.entry(key).or_default().push(slot);
        }
        self.docs.push(doc);
    }

    fn reindex(&mut self, slot: usize, old_key: Option<i64>, new_key: Option<i64>) {
        if old_key == new_key {
            return;
        }
        if let Some(old) = old_key
            && let Some(bucket) = self.by_key.get_mut(&old)
        {
            bucket.retain(|&i| i != slot);
            if bucket.is_empty() {
                self.by_key.remove(&old);
            }
        }
        if let Some(new) = new_key {
            self.by_key.entry(new).or_default().push(slot);
        }
    }
}

/// `DocumentStore` adapter backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Collection>> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Collection>> {
        self.collections.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of documents currently held by `ns` (zero if absent).
    #[must_use]
    pub fn document_count(&self, ns: &str) -> usize {
        self.read().get(ns).map_or(0, |coll| coll.docs.len())
    }
}

impl DocumentStore for MemoryStore {
    fn drop_collection(&self, ns: &str) -> Result<(), StoreError> {
        self.write().remove(ns);
        Ok(())
    }

    fn insert(&self, ns: &str, docs: Vec<Document>) -> Result<(), StoreError> {
        let mut collections = self.write();
        let collection = collections.entry(ns.to_owned()).or_default();
        for doc in docs {
            collection.insert(doc);
        }
        Ok(())
    }

    fn ensure_index(&self, ns: &str, spec: &IndexSpec) -> Result<(), StoreError> {
        let mut collections = self.write();
        let collection = collections
            .get_mut(ns)
            .ok_or_else(|| StoreError::NotFound { ns: ns.to_owned() })?;
        if !collection.indexes.iter().any(|existing| existing.name == spec.name) {
            collection.indexes.push(spec.clone());
        }
        Ok(())
    }

    fn update_one(
        &self,
        ns: &str,
        key: i64,
        deltas: &BTreeMap<String, i64>,
    ) -> Result<u64, StoreError> {
        let mut collections = self.write();
        let collection = collections
            .get_mut(ns)
            .ok_or_else(|| StoreError::NotFound { ns: ns.to_owned() })?;

        let Some(&slot) = collection.by_key.get(&key).and_then(|bucket| bucket.first()) else {
            return Ok(0);
        };
        let doc = &mut collection.docs[slot];
        let old_key = doc.key();
        for (field, delta) in deltas {
            let value = doc.fields.entry(field.clone()).or_insert(0);
            *value = value.saturating_add(*delta);
        }
        let new_key = doc.key();
        collection.reindex(slot, old_key, new_key);
        Ok(1)
    }

    fn find_by_key(&self, ns: &str, key: i64) -> Result<Vec<Document>, StoreError> {
        let collections = self.read();
        let collection = collections
            .get(ns)
            .ok_or_else(|| StoreError::NotFound { ns: ns.to_owned() })?;
        Ok(collection
            .by_key
            .get(&key)
            .map(|bucket| bucket.iter().map(|&slot| collection.docs[slot].clone()).collect())
            .unwrap_or_default())
    }

    fn scan_range(&self, ns: &str, lo: i64, hi: i64) -> Result<Vec<Document>, StoreError> {
        let collections = self.read();
        let collection = collections
            .get(ns)
            .ok_or_else(|| StoreError::NotFound { ns: ns.to_owned() })?;
        Ok(collection
            .by_key
            .range(lo..hi)
            .flat_map(|(_, bucket)| bucket.iter().map(|&slot| collection.docs[slot].clone()))
            .collect())
    }
}
