//! Error types for configuration loading.

/// Errors returned when loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Config file parse error.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// No platform data directory available for the default store root.
    #[error("no data directory available for the default store root")]
    NoDataDir,
}
