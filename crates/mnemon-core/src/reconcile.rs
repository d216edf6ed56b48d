//! Shared read-extract-merge-write procedure for the update nodes.

use crate::error::CoreError;
use crate::prompt;
use chrono::Utc;
use log::debug;
use mnemon_protocol::{
    Conversation, ExistingRecord, ExtractionCapability, ExtractionRequest, RecordSchema,
};
use mnemon_store::{MemoryStore, Namespace, NamespaceLeases};
use std::collections::HashSet;
use uuid::Uuid;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Records written under a fresh key.
    pub inserted: usize,
    /// Records that replaced an existing key.
    pub updated: usize,
}

/// Reconcile one namespace against the conversation.
///
/// Holds the namespace writer lease for the whole cycle and commits all
/// writes in a single atomic batch: a failed pass leaves the namespace
/// exactly as it was read.
pub async fn reconcile(
    store: &dyn MemoryStore,
    leases: &NamespaceLeases,
    namespace: &Namespace,
    schema: RecordSchema,
    conversation: &Conversation,
    extractor: &dyn ExtractionCapability,
) -> Result<ReconcileOutcome, CoreError> {
    let _lease = leases.acquire(namespace).await;

    let existing = store.search(namespace).await?;
    let existing_keys: HashSet<&str> = existing.iter().map(|record| record.key.as_str()).collect();
    let request = ExtractionRequest::from_conversation(
        schema,
        prompt::reconcile_instruction(Utc::now()),
        existing
            .iter()
            .map(|record| ExistingRecord {
                key: record.key.clone(),
                schema: schema.name(),
                value: record.value.clone(),
            })
            .collect(),
        conversation,
    );

    let extracted = extractor.extract(request).await?;

    let mut entries = Vec::with_capacity(extracted.len());
    let mut outcome = ReconcileOutcome {
        inserted: 0,
        updated: 0,
    };
    for record in extracted {
        schema.validate(&record.value)?;
        let key = match record.correlation_id {
            Some(id) if existing_keys.contains(id.as_str()) => {
                outcome.updated += 1;
                id
            }
            // A correlation id the store has never seen is a fresh
            // identity minted upstream: an insert under that key.
            Some(id) => {
                outcome.inserted += 1;
                id
            }
            None => {
                outcome.inserted += 1;
                Uuid::new_v4().to_string()
            }
        };
        entries.push((key, record.value));
    }

    store.put_many(namespace, entries).await?;
    debug!(
        "reconciled namespace (namespace={}, schema={}, inserted={}, updated={})",
        namespace,
        schema.name(),
        outcome.inserted,
        outcome.updated
    );
    Ok(outcome)
}
