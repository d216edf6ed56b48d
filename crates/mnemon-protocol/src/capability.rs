//! Contracts for the external model and extraction collaborators.

use crate::schema::RecordSchema;
use crate::{Conversation, Message};
use async_trait::async_trait;
use serde_json::Value;

/// Errors surfaced by external capabilities.
///
/// Fatal for the current turn; the core performs no retries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CapabilityError {
    /// Model capability failed to produce a reply.
    #[error("model capability error: {0}")]
    Model(String),
    /// Extraction capability failed to produce records.
    #[error("extraction capability error: {0}")]
    Extraction(String),
}

/// Constraint on directive emission for a model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveConstraint {
    /// Plain reply; directives are ignored if emitted.
    None,
    /// At most one directive may accompany the reply.
    SingleDirective,
}

/// Request for one model invocation.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Fully assembled system prompt.
    pub system_prompt: String,
    /// Conversation presented to the model.
    pub messages: Vec<Message>,
    /// Directive constraint for this invocation.
    pub constraint: DirectiveConstraint,
}

/// Language-model capability producing conversational replies.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    /// Produce the next reply for the given context and conversation.
    async fn invoke(&self, request: ModelRequest) -> Result<Message, CapabilityError>;
}

/// Existing record presented to the extraction capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingRecord {
    /// Store key of the record.
    pub key: String,
    /// Schema name of the record.
    pub schema: &'static str,
    /// Current record value.
    pub value: Value,
}

/// Request for one extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Schema the extracted values must conform to.
    pub schema: RecordSchema,
    /// Fixed instruction telling the capability to reconcile, not append.
    pub instruction: String,
    /// Records already stored in the target namespace.
    pub existing: Vec<ExistingRecord>,
    /// Conversation content, excluding the directive trigger.
    pub messages: Vec<Message>,
}

impl ExtractionRequest {
    /// Assemble a request from a conversation, dropping the trigger tail.
    pub fn from_conversation(
        schema: RecordSchema,
        instruction: impl Into<String>,
        existing: Vec<ExistingRecord>,
        conversation: &Conversation,
    ) -> Self {
        Self {
            schema,
            instruction: instruction.into(),
            existing,
            messages: conversation.without_trigger().to_vec(),
        }
    }
}

/// Value produced by an extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    /// New or updated record value.
    pub value: Value,
    /// Existing key this value updates; absent means insert.
    pub correlation_id: Option<String>,
}

impl ExtractedRecord {
    /// A value to insert under a fresh key.
    pub fn insert(value: Value) -> Self {
        Self {
            value,
            correlation_id: None,
        }
    }

    /// A value updating the record stored under `key`.
    pub fn update(key: impl Into<String>, value: Value) -> Self {
        Self {
            value,
            correlation_id: Some(key.into()),
        }
    }
}

/// Structured-extraction capability turning free text into typed records.
#[async_trait]
pub trait ExtractionCapability: Send + Sync {
    /// Reconcile existing records with the conversation content.
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<ExtractedRecord>, CapabilityError>;
}
