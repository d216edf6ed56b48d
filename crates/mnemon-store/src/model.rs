//! Record model for namespaced memory.

use crate::namespace::Namespace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted memory record.
///
/// `key` is store-assigned identity: unique within the namespace and
/// stable across reconciliation passes that update the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Namespace the record belongs to.
    pub namespace: Namespace,
    /// Record identity within the namespace.
    pub key: String,
    /// Typed payload serialized as JSON.
    pub value: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Build a fresh record stamped with the current time.
    pub fn new(namespace: Namespace, key: impl Into<String>, value: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            namespace,
            key: key.into(),
            value,
            created_at: now,
            updated_at: now,
        }
    }
}
