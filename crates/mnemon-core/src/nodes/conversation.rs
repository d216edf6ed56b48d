//! Conversation node: loads the three memory categories and produces a
//! personalized reply or an update directive.

use crate::error::CoreError;
use crate::prompt;
use log::debug;
use mnemon_config::SessionScope;
use mnemon_protocol::{
    Conversation, DirectiveConstraint, INSTRUCTIONS_KEY, Message, ModelCapability, ModelRequest,
};
use mnemon_store::{MemoryStore, Namespace};
use serde_json::Value;

/// Run one conversation step: read memory, invoke the model, append the
/// reply. Returns a copy of the appended message.
pub async fn run_conversation(
    store: &dyn MemoryStore,
    model: &dyn ModelCapability,
    scope: &SessionScope,
    conversation: &mut Conversation,
) -> Result<Message, CoreError> {
    let profile_ns = Namespace::profile(&scope.category, &scope.user_id);
    let todo_ns = Namespace::todo(&scope.category, &scope.user_id);
    let instructions_ns = Namespace::instructions(&scope.category, &scope.user_id);

    let profile = store
        .search(&profile_ns)
        .await?
        .into_iter()
        .next()
        .map(|record| record.value);
    let todos: Vec<Value> = store
        .search(&todo_ns)
        .await?
        .into_iter()
        .map(|record| record.value)
        .collect();
    let instructions = store
        .get(&instructions_ns, INSTRUCTIONS_KEY)
        .await?
        .and_then(|record| {
            record
                .value
                .get("memory")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default();

    debug!(
        "assembled personalization context (user_id={}, has_profile={}, todos={}, instructions_len={})",
        scope.user_id,
        profile.is_some(),
        todos.len(),
        instructions.len()
    );

    let system_prompt =
        prompt::conversation_system_prompt(scope, profile.as_ref(), &todos, &instructions);
    let reply = model
        .invoke(ModelRequest {
            system_prompt,
            messages: conversation.messages().to_vec(),
            constraint: DirectiveConstraint::SingleDirective,
        })
        .await?;
    conversation.push(reply.clone());
    Ok(reply)
}
