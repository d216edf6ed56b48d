use async_trait::async_trait;
use mnemon_protocol::{
    CapabilityError, ExtractedRecord, ExtractionCapability, ExtractionRequest,
};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Extractor double returning the same batch on every call.
#[derive(Debug, Clone)]
pub struct FixedExtractor {
    records: Vec<ExtractedRecord>,
}

impl FixedExtractor {
    pub fn new(records: Vec<ExtractedRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ExtractionCapability for FixedExtractor {
    async fn extract(
        &self,
        _request: ExtractionRequest,
    ) -> Result<Vec<ExtractedRecord>, CapabilityError> {
        Ok(self.records.clone())
    }
}

/// Extractor double popping scripted batches in order.
pub struct ScriptedExtractor {
    batches: Mutex<VecDeque<Vec<ExtractedRecord>>>,
}

impl ScriptedExtractor {
    pub fn new(batches: Vec<Vec<ExtractedRecord>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }
}

#[async_trait]
impl ExtractionCapability for ScriptedExtractor {
    async fn extract(
        &self,
        _request: ExtractionRequest,
    ) -> Result<Vec<ExtractedRecord>, CapabilityError> {
        self.batches
            .lock()
            .pop_front()
            .ok_or_else(|| CapabilityError::Extraction("extraction script exhausted".to_string()))
    }
}

/// Extractor double capturing every request alongside a fixed batch.
pub struct RecordingExtractor {
    records: Vec<ExtractedRecord>,
    pub requests: Mutex<Vec<ExtractionRequest>>,
}

impl RecordingExtractor {
    pub fn new(records: Vec<ExtractedRecord>) -> Self {
        Self {
            records,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExtractionCapability for RecordingExtractor {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<ExtractedRecord>, CapabilityError> {
        self.requests.lock().push(request);
        Ok(self.records.clone())
    }
}

/// Extractor double failing every call.
#[derive(Debug, Clone)]
pub struct FailingExtractor {
    message: String,
}

impl FailingExtractor {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ExtractionCapability for FailingExtractor {
    async fn extract(
        &self,
        _request: ExtractionRequest,
    ) -> Result<Vec<ExtractedRecord>, CapabilityError> {
        Err(CapabilityError::Extraction(self.message.clone()))
    }
}
