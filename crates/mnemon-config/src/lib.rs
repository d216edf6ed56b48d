//! Configuration for the mnemon orchestrator.

pub mod error;
pub mod model;

/// Config error type.
pub use error::ConfigError;
/// Configuration schema and builder.
pub use model::{MnemonConfig, MnemonConfigBuilder, SessionScope, StoreConfig, TurnLimits};
