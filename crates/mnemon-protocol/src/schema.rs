//! Typed record payloads for the three memory categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed key of the single instructions record in its namespace.
pub const INSTRUCTIONS_KEY: &str = "user_instructions";

/// Record value rejected at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {schema} record: {reason}")]
pub struct InvalidRecord {
    /// Schema the value was validated against.
    pub schema: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl InvalidRecord {
    fn new(schema: &'static str, reason: impl Into<String>) -> Self {
        Self {
            schema,
            reason: reason.into(),
        }
    }
}

/// Profile of the user the agent is chatting with.
///
/// Valid with zero fields populated; reconciliation fills it in over time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The user's name.
    #[serde(default)]
    pub name: Option<String>,
    /// The user's location.
    #[serde(default)]
    pub location: Option<String>,
    /// The user's job.
    #[serde(default)]
    pub job: Option<String>,
    /// Personal connections such as family members, friends, or coworkers.
    #[serde(default)]
    pub connections: Vec<String>,
    /// Interests the user has.
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TodoStatus {
    /// Not started yet.
    #[default]
    #[serde(rename = "not started")]
    NotStarted,
    /// Actively being worked on.
    #[serde(rename = "in progress")]
    InProgress,
    /// Completed.
    #[serde(rename = "done")]
    Done,
    /// Kept for the record but no longer active.
    #[serde(rename = "archived")]
    Archived,
}

impl TodoStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "not started",
            TodoStatus::InProgress => "in progress",
            TodoStatus::Done => "done",
            TodoStatus::Archived => "archived",
        }
    }
}

/// A single task on the user's list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToDo {
    /// The task to be completed.
    pub task: String,
    /// Estimated time to complete the task (minutes).
    #[serde(default)]
    pub time_to_complete: Option<u32>,
    /// When the task needs to be completed by, if applicable.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Specific, actionable solutions relevant to completing the task.
    #[serde(default)]
    pub solutions: Vec<String>,
    /// Current status of the task.
    #[serde(default)]
    pub status: TodoStatus,
}

impl ToDo {
    /// Build a not-started task with no estimate or deadline.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            time_to_complete: None,
            deadline: None,
            solutions: Vec::new(),
            status: TodoStatus::NotStarted,
        }
    }

    /// Validate invariants that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.task.trim().is_empty() {
            return Err(InvalidRecord::new(
                RecordSchema::Todo.name(),
                "task must not be empty",
            ));
        }
        if self.status == TodoStatus::Done && self.solutions.is_empty() {
            return Err(InvalidRecord::new(
                RecordSchema::Todo.name(),
                "a done task requires at least one solution",
            ));
        }
        Ok(())
    }
}

/// Schema a reconciliation pass extracts and validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSchema {
    /// User profile fragments.
    Profile,
    /// Task list entries.
    Todo,
}

impl RecordSchema {
    /// Schema name presented to the extraction capability.
    pub fn name(&self) -> &'static str {
        match self {
            RecordSchema::Profile => "Profile",
            RecordSchema::Todo => "ToDo",
        }
    }

    /// Validate an extracted value before it reaches the store.
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), InvalidRecord> {
        match self {
            RecordSchema::Profile => {
                serde_json::from_value::<Profile>(value.clone())
                    .map_err(|err| InvalidRecord::new(self.name(), err.to_string()))?;
            }
            RecordSchema::Todo => {
                let todo: ToDo = serde_json::from_value(value.clone())
                    .map_err(|err| InvalidRecord::new(self.name(), err.to_string()))?;
                todo.validate()?;
            }
        }
        Ok(())
    }
}
