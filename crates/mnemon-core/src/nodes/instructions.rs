//! Instructions update node.
//!
//! Unlike the profile and todo nodes this is not a multi-record
//! reconciliation: the namespace holds exactly one record under a fixed
//! key, and every update is a full-text overwrite.

use crate::error::CoreError;
use crate::prompt;
use log::debug;
use mnemon_config::SessionScope;
use mnemon_protocol::{
    Conversation, DirectiveConstraint, INSTRUCTIONS_KEY, Message, ModelCapability, ModelRequest,
};
use mnemon_store::{MemoryStore, Namespace, NamespaceLeases};
use serde_json::{Value, json};

/// Rewrite the standing instructions from the conversation and overwrite
/// the single instructions record.
pub async fn update_instructions(
    store: &dyn MemoryStore,
    leases: &NamespaceLeases,
    model: &dyn ModelCapability,
    scope: &SessionScope,
    conversation: &mut Conversation,
    call_id: &str,
) -> Result<(), CoreError> {
    let namespace = Namespace::instructions(&scope.category, &scope.user_id);
    let _lease = leases.acquire(&namespace).await;

    let current = store
        .get(&namespace, INSTRUCTIONS_KEY)
        .await?
        .and_then(|record| {
            record
                .value
                .get("memory")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

    let mut messages = conversation.without_trigger().to_vec();
    messages.push(Message::user(
        "Please update the instructions based on the conversation",
    ));
    let reply = model
        .invoke(ModelRequest {
            system_prompt: prompt::instructions_rewrite_prompt(current.as_deref()),
            messages,
            constraint: DirectiveConstraint::None,
        })
        .await?;

    let content_len = reply.content.len();
    store
        .put(&namespace, INSTRUCTIONS_KEY, json!({ "memory": reply.content }))
        .await?;
    debug!(
        "instructions overwritten (user_id={}, content_len={})",
        scope.user_id, content_len
    );
    conversation.push(Message::tool_confirmation(call_id, "updated instructions"));
    Ok(())
}
