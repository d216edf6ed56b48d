//! Namespaced persistence for long-term agent memory.

pub mod error;
pub mod file;
pub mod lease;
pub mod model;
pub mod namespace;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// JSONL file-backed store.
pub use file::FileStore;
/// Per-namespace writer leases.
pub use lease::{NamespaceLease, NamespaceLeases};
/// Memory record model.
pub use model::MemoryRecord;
/// Namespace addressing.
pub use namespace::{MemoryKind, Namespace};
/// Store contract and in-memory implementation.
pub use store::{InMemoryStore, MemoryStore};
