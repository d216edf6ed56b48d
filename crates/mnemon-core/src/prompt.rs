//! System prompt assembly for the conversation and update nodes.

use chrono::{DateTime, Utc};
use mnemon_config::SessionScope;
use serde_json::Value;

/// Role descriptor used when the session supplies none.
const DEFAULT_ROLE: &str = "You are a helpful assistant. You maintain the user's profile, their \
     task list, and their standing preferences, and you use all three to personalize replies.";

/// Build the conversation node's system prompt from the three memory
/// categories and the session role descriptor.
pub fn conversation_system_prompt(
    scope: &SessionScope,
    profile: Option<&Value>,
    todos: &[Value],
    instructions: &str,
) -> String {
    let role = scope.role_prompt.as_deref().unwrap_or(DEFAULT_ROLE);
    let profile_section = profile.map_or_else(|| "None".to_string(), Value::to_string);
    let todo_section = if todos.is_empty() {
        "None".to_string()
    } else {
        todos
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let instructions_section = if instructions.trim().is_empty() {
        "None"
    } else {
        instructions
    };
    format!(
        "{role}\n\n\
         ## User Profile\n{profile_section}\n\n\
         ## Task List\n{todo_section}\n\n\
         ## Preferences\n{instructions_section}\n\n\
         When the conversation reveals new profile facts, tasks, or \
         preferences, emit exactly one update directive naming the \
         category to reconcile; otherwise reply normally."
    )
}

/// Fixed instruction presented to the extraction capability, telling it
/// to reconcile against the existing records rather than append blindly.
pub fn reconcile_instruction(now: DateTime<Utc>) -> String {
    format!(
        "Reflect on the conversation below and reconcile it with the \
         existing records: update a record when the conversation refines \
         it, insert a new record only for genuinely new content. \
         Current time: {}.",
        now.to_rfc3339()
    )
}

/// Prompt asking the model to rewrite the standing instructions in full.
pub fn instructions_rewrite_prompt(current: Option<&str>) -> String {
    format!(
        "Based on the conversation, rewrite the user's standing \
         instructions for how their task list should be maintained. \
         Produce the complete replacement text.\n\n\
         ## Current instructions\n{}",
        current.unwrap_or("None")
    )
}
