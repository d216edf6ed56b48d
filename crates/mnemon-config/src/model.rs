//! Configuration schema for mnemon.

use crate::error::ConfigError;
use directories::BaseDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root config for the mnemon orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MnemonConfig {
    /// Session scope supplying namespace coordinates.
    #[serde(default)]
    pub session: SessionScope,
    /// Per-turn limits.
    #[serde(default)]
    pub limits: TurnLimits,
    /// Store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl MnemonConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MnemonConfigBuilder {
        MnemonConfigBuilder::new()
    }

    /// Load a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        info!(
            "loaded config (path={}, user_id={}, category={})",
            path.as_ref().display(),
            config.session.user_id,
            config.session.category
        );
        Ok(config)
    }
}

/// Builder for assembling a `MnemonConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MnemonConfigBuilder {
    config: MnemonConfig,
}

impl MnemonConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MnemonConfig::default(),
        }
    }

    /// Replace the session scope.
    pub fn session(mut self, session: SessionScope) -> Self {
        self.config.session = session;
        self
    }

    /// Replace the per-turn limits.
    pub fn limits(mut self, limits: TurnLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Replace the store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Finalize and return the built `MnemonConfig`.
    pub fn build(self) -> MnemonConfig {
        self.config
    }
}

/// Read-only session scope.
///
/// Supplies the (category, user) coordinates every namespace is derived
/// from; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionScope {
    /// User the session belongs to.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Memory category for the session.
    #[serde(default = "default_category")]
    pub category: String,
    /// Optional role descriptor injected into the system prompt.
    #[serde(default)]
    pub role_prompt: Option<String>,
}

impl SessionScope {
    /// Build a scope for a (user, category) pair.
    pub fn new(user_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            role_prompt: None,
        }
    }

    /// Attach a role descriptor.
    pub fn with_role_prompt(mut self, role_prompt: impl Into<String>) -> Self {
        self.role_prompt = Some(role_prompt.into());
        self
    }
}

impl Default for SessionScope {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            category: default_category(),
            role_prompt: None,
        }
    }
}

fn default_user_id() -> String {
    "default-user".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

/// Per-turn limits guarding against a misbehaving model capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnLimits {
    /// Maximum update dispatches allowed within one turn.
    #[serde(default = "default_max_dispatches")]
    pub max_dispatches: usize,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            max_dispatches: default_max_dispatches(),
        }
    }
}

fn default_max_dispatches() -> usize {
    8
}

/// Store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Root directory for file-backed stores; platform default if unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl StoreConfig {
    /// Resolve the store root, falling back to the platform data dir.
    pub fn resolve_root(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.path {
            return Ok(PathBuf::from(path));
        }
        let base = BaseDirs::new().ok_or(ConfigError::NoDataDir)?;
        Ok(base.data_local_dir().join("mnemon").join("memory"))
    }
}
