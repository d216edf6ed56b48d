//! Namespace addressing for memory records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory category partitioning stored records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    /// User profile fragments.
    Profile,
    /// Task list entries.
    Todo,
    /// Standing instructions blob.
    Instructions,
}

impl MemoryKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Profile => "profile",
            MemoryKind::Todo => "todo",
            MemoryKind::Instructions => "instructions",
        }
    }
}

/// (kind, category, user) triple addressing one partition of the store.
///
/// Derived from session configuration only; nodes never invent one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Memory kind.
    pub kind: MemoryKind,
    /// Category scoping the memory, e.g. "general" or "work".
    pub category: String,
    /// User the memory belongs to.
    pub user_id: String,
}

impl Namespace {
    /// Build a namespace from its three components.
    pub fn new(kind: MemoryKind, category: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.into(),
            user_id: user_id.into(),
        }
    }

    /// Profile namespace for a (category, user) pair.
    pub fn profile(category: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(MemoryKind::Profile, category, user_id)
    }

    /// Todo namespace for a (category, user) pair.
    pub fn todo(category: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(MemoryKind::Todo, category, user_id)
    }

    /// Instructions namespace for a (category, user) pair.
    pub fn instructions(category: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(MemoryKind::Instructions, category, user_id)
    }

    /// Path-safe file stem for file-backed layouts.
    pub(crate) fn storage_stem(&self) -> String {
        format!(
            "{}.{}.{}",
            self.kind.as_str(),
            sanitize_segment(&self.category),
            sanitize_segment(&self.user_id)
        )
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind.as_str(), self.category, self.user_id)
    }
}

/// Keep alphanumerics, `-` and `_`; anything else becomes `_`.
fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
