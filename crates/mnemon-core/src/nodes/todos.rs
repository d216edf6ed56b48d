//! Task list update node.

use crate::error::CoreError;
use crate::reconcile::reconcile;
use log::debug;
use mnemon_config::SessionScope;
use mnemon_protocol::{Conversation, ExtractionCapability, Message, RecordSchema};
use mnemon_store::{MemoryStore, Namespace, NamespaceLeases};

/// Reconcile the todo namespace and confirm the directive with a short
/// change report.
pub async fn update_todos(
    store: &dyn MemoryStore,
    leases: &NamespaceLeases,
    extractor: &dyn ExtractionCapability,
    scope: &SessionScope,
    conversation: &mut Conversation,
    call_id: &str,
) -> Result<(), CoreError> {
    let namespace = Namespace::todo(&scope.category, &scope.user_id);
    let outcome = reconcile(
        store,
        leases,
        &namespace,
        RecordSchema::Todo,
        conversation,
        extractor,
    )
    .await?;
    debug!(
        "todos updated (user_id={}, inserted={}, updated={})",
        scope.user_id, outcome.inserted, outcome.updated
    );
    let summary = format!(
        "updated todos: {} inserted, {} updated",
        outcome.inserted, outcome.updated
    );
    conversation.push(Message::tool_confirmation(call_id, summary));
    Ok(())
}
