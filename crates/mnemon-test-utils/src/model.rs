use async_trait::async_trait;
use mnemon_protocol::{CapabilityError, Message, ModelCapability, ModelRequest};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Model double returning the same reply on every invocation.
#[derive(Debug, Clone)]
pub struct FixedModel {
    reply: Message,
}

impl FixedModel {
    pub fn new(reply: Message) -> Self {
        Self { reply }
    }
}

#[async_trait]
impl ModelCapability for FixedModel {
    async fn invoke(&self, _request: ModelRequest) -> Result<Message, CapabilityError> {
        Ok(self.reply.clone())
    }
}

/// Model double popping scripted replies in order.
///
/// Errors once the script is exhausted, so tests fail loudly on an
/// unexpected extra invocation.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Message>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl ModelCapability for ScriptedModel {
    async fn invoke(&self, _request: ModelRequest) -> Result<Message, CapabilityError> {
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| CapabilityError::Model("model script exhausted".to_string()))
    }
}

/// Model double capturing every request alongside a fixed reply.
pub struct RecordingModel {
    reply: Message,
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl RecordingModel {
    pub fn new(reply: Message) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelCapability for RecordingModel {
    async fn invoke(&self, request: ModelRequest) -> Result<Message, CapabilityError> {
        self.requests.lock().push(request);
        Ok(self.reply.clone())
    }
}

/// Model double failing every invocation.
#[derive(Debug, Clone)]
pub struct FailingModel {
    message: String,
}

impl FailingModel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ModelCapability for FailingModel {
    async fn invoke(&self, _request: ModelRequest) -> Result<Message, CapabilityError> {
        Err(CapabilityError::Model(self.message.clone()))
    }
}
