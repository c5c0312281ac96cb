// Rust guideline compliant 2026-03-06

//! Concrete `DocumentStore` adapters wired by the entry point.

pub mod memory_store;
