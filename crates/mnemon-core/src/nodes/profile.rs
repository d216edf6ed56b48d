//! Profile update node.

use crate::error::CoreError;
use crate::reconcile::reconcile;
use log::debug;
use mnemon_config::SessionScope;
use mnemon_protocol::{Conversation, ExtractionCapability, Message, RecordSchema};
use mnemon_store::{MemoryStore, Namespace, NamespaceLeases};

/// Reconcile the profile namespace and confirm the directive.
pub async fn update_profile(
    store: &dyn MemoryStore,
    leases: &NamespaceLeases,
    extractor: &dyn ExtractionCapability,
    scope: &SessionScope,
    conversation: &mut Conversation,
    call_id: &str,
) -> Result<(), CoreError> {
    let namespace = Namespace::profile(&scope.category, &scope.user_id);
    let outcome = reconcile(
        store,
        leases,
        &namespace,
        RecordSchema::Profile,
        conversation,
        extractor,
    )
    .await?;
    debug!(
        "profile updated (user_id={}, inserted={}, updated={})",
        scope.user_id, outcome.inserted, outcome.updated
    );
    conversation.push(Message::tool_confirmation(call_id, "updated profile"));
    Ok(())
}
