//! Error types for store operations.

/// Errors returned by memory stores.
///
/// Absence of a record is never an error; reads return `None` or an
/// empty listing instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
