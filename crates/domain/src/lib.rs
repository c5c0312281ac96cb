// Rust guideline compliant 2026-03-02

//! Shared domain types for the document-store stress tool.
//!
//! Defines `Document`, `IndexSpec`, `StoreError`, and the `DocumentStore`
//! hexagonal port trait. All workload crates depend on this crate; no other
//! workspace crate is imported here.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Name of the keyed field every workload samples on.
///
/// Synthetic documents name their fields `a`, `b`, `c`, ... in generation
/// order, so the first field is always `a`. Point lookups, range scans, and
/// updates all select documents through this field.
pub const KEY_FIELD: &str = "a";

/// A single synthetic document, as inserted into and returned by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier (UUID v4-compatible random bytes).
    pub id: Uuid,
    /// Named integer fields, `a`, `b`, `c`, ...
    pub fields: BTreeMap<String, i64>,
    /// Opaque filler bytes inflating the document to a configured size.
    pub padding: Vec<u8>,
}

impl Document {
    /// Value of the keyed field `a`, if the document carries one.
    #[must_use]
    pub fn key(&self) -> Option<i64> {
        self.fields.get(KEY_FIELD).copied()
    }
}

/// Direction of one field within a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    Ascending,
    Descending,
}

/// A secondary index requested on a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index name, e.g. `a_1_b_-1`.
    pub name: String,
    /// Indexed fields in order, each with a direction.
    pub keys: Vec<(String, IndexOrder)>,
}

/// Errors a `DocumentStore` implementation may return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The named collection does not exist.
    #[error("collection not found: {ns}")]
    NotFound {
        /// Namespace of the missing collection.
        ns: String,
    },
    /// The backend rejected or failed the operation; retrying may succeed.
    #[error("store backend error: {reason}")]
    Backend {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Hexagonal port: a document-oriented database as seen by the workloads.
///
/// Implementations live outside the domain and workload crates (e.g. in the
/// binary crate). Workloads depend exclusively on this trait, never on a
/// concrete adapter. All methods may block on I/O; implementations must be
/// safe to call from many worker threads at once.
pub trait DocumentStore: Send + Sync {
    /// Drop the collection `ns` and everything in it. Dropping a collection
    /// that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the drop fails.
    fn drop_collection(&self, ns: &str) -> Result<(), StoreError>;

    /// Insert a batch of documents into `ns`, creating the collection on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the insert fails; the batch is
    /// then not partially applied.
    fn insert(&self, ns: &str, docs: Vec<Document>) -> Result<(), StoreError>;

    /// Create the secondary index described by `spec` on `ns` if it does
    /// not already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the collection does not exist,
    /// or [`StoreError::Backend`] if index creation fails.
    fn ensure_index(&self, ns: &str, spec: &IndexSpec) -> Result<(), StoreError>;

    /// Finalize any pending bulk-load state for `ns`.
    ///
    /// Backends without a bulk-load optimization keep this default no-op.
    /// Once a commit has begun it runs to completion; callers observe
    /// cancellation only after it returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the commit fails.
    fn commit(&self, ns: &str) -> Result<(), StoreError> {
        let _ = ns;
        Ok(())
    }

    /// Apply `deltas` (field increments) to the first document in `ns`
    /// whose keyed field equals `key`. Returns the number of documents
    /// modified (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the collection does not exist,
    /// or [`StoreError::Backend`] if the update fails.
    fn update_one(
        &self,
        ns: &str,
        key: i64,
        deltas: &BTreeMap<String, i64>,
    ) -> Result<u64, StoreError>;

    /// Return every document in `ns` whose keyed field equals `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the collection does not exist,
    /// or [`StoreError::Backend`] if the read fails.
    fn find_by_key(&self, ns: &str, key: i64) -> Result<Vec<Document>, StoreError>;

    /// Return every document in `ns` whose keyed field lies in `lo..hi`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the collection does not exist,
    /// or [`StoreError::Backend`] if the read fails.
    fn scan_range(&self, ns: &str, lo: i64, hi: i64) -> Result<Vec<Document>, StoreError>;
}
