//! Store contract and the in-memory implementation.

use crate::error::StoreError;
use crate::model::MemoryRecord;
use crate::namespace::Namespace;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Namespaced key-value store for long-term memory.
///
/// Implementations must partition records strictly by namespace; the
/// user id inside the namespace is the only cross-session isolation.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Fetch a single record by key.
    async fn get(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<MemoryRecord>, StoreError>;

    /// List every record in a namespace, in insertion order.
    async fn search(&self, namespace: &Namespace) -> Result<Vec<MemoryRecord>, StoreError>;

    /// Insert or replace a single record.
    async fn put(&self, namespace: &Namespace, key: &str, value: Value) -> Result<(), StoreError> {
        self.put_many(namespace, vec![(key.to_string(), value)])
            .await
    }

    /// Insert or replace a batch of records.
    ///
    /// The batch commits atomically: either every entry becomes durable
    /// or none does. This is the commit point of a reconciliation pass.
    async fn put_many(
        &self,
        namespace: &Namespace,
        entries: Vec<(String, Value)>,
    ) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
///
/// Records are kept per namespace in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<Namespace, Vec<MemoryRecord>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<MemoryRecord>, StoreError> {
        let data = self.data.read();
        Ok(data
            .get(namespace)
            .and_then(|records| records.iter().find(|record| record.key == key))
            .cloned())
    }

    async fn search(&self, namespace: &Namespace) -> Result<Vec<MemoryRecord>, StoreError> {
        let data = self.data.read();
        Ok(data.get(namespace).cloned().unwrap_or_default())
    }

    async fn put_many(
        &self,
        namespace: &Namespace,
        entries: Vec<(String, Value)>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let records = data.entry(namespace.clone()).or_default();
        for (key, value) in entries {
            upsert(records, namespace, key, value);
        }
        debug!(
            "committed batch (namespace={}, records={})",
            namespace,
            records.len()
        );
        Ok(())
    }
}

/// Replace the value under `key`, or append a fresh record.
pub(crate) fn upsert(
    records: &mut Vec<MemoryRecord>,
    namespace: &Namespace,
    key: String,
    value: Value,
) {
    match records.iter_mut().find(|record| record.key == key) {
        Some(record) => {
            record.value = value;
            record.updated_at = Utc::now();
        }
        None => records.push(MemoryRecord::new(namespace.clone(), key, value)),
    }
}
