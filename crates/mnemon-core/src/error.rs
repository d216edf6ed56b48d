//! Error types for the core orchestration crate.

use mnemon_protocol::{CapabilityError, InvalidRecord};
use mnemon_store::StoreError;
use thiserror::Error;

/// Errors returned by turn orchestration.
///
/// Every variant is fatal for the current turn and bubbles to the
/// caller; the core performs no silent recovery and no retries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Directive value outside the closed routing set.
    #[error("unknown directive: {0:?}")]
    UnknownDirective(String),
    /// Model or extraction capability failure.
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),
    /// Store read/write failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Extracted value rejected before the write boundary.
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),
    /// A turn exceeded its configured dispatch budget.
    #[error("dispatch limit exceeded after {0} dispatches")]
    DispatchLimit(usize),
}
