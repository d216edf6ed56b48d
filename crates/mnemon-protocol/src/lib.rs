//! Shared protocol types for mnemon: conversation messages, record
//! schemas, and the external capability contracts.

mod capability;
mod schema;

pub use capability::{
    CapabilityError, DirectiveConstraint, ExistingRecord, ExtractedRecord, ExtractionCapability,
    ExtractionRequest, ModelCapability, ModelRequest,
};
pub use schema::{INSTRUCTIONS_KEY, InvalidRecord, Profile, RecordSchema, ToDo, TodoStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker role for a conversation message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-generated message.
    System,
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
    /// Confirmation for a directive the assistant emitted.
    Tool,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// Structured memory-update decision attached to an assistant reply.
///
/// `update_type` is carried verbatim as emitted by the model capability;
/// parsing it into the closed directive set happens in the router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectiveCall {
    /// Call id used to correlate the eventual confirmation message.
    pub id: String,
    /// Raw memory-category value emitted by the model capability.
    pub update_type: String,
}

impl DirectiveCall {
    /// Build a directive call from its id and raw category value.
    pub fn new(id: impl Into<String>, update_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            update_type: update_type.into(),
        }
    }
}

/// Message in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role that produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Directive attached to an assistant reply, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive_call: Option<DirectiveCall>,
    /// Id of the directive call a tool confirmation responds to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Timestamp for the message.
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            directive_call: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Build a plain assistant reply.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build an assistant reply carrying an update directive.
    pub fn assistant_directive(content: impl Into<String>, call: DirectiveCall) -> Self {
        Self {
            directive_call: Some(call),
            ..Self::new(Role::Assistant, content)
        }
    }

    /// Build a tool confirmation responding to a directive call.
    pub fn tool_confirmation(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }
}

/// Append-only conversation transcript for one session turn.
///
/// Owned by the session driver; nodes read it and only ever append.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation seeded with prior messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages excluding a final directive-bearing trigger.
    ///
    /// The trigger names which category to reconcile; it is not content
    /// for the extraction capability to reconcile against.
    pub fn without_trigger(&self) -> &[Message] {
        match self.messages.last() {
            Some(message) if message.directive_call.is_some() => {
                &self.messages[..self.messages.len() - 1]
            }
            _ => &self.messages,
        }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
