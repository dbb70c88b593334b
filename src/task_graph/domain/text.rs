//! Validated text values carried by the task graph.

use super::TaskGraphDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The objective a task graph works towards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Goal(String);

impl Goal {
    /// Creates a validated goal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyGoal`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskGraphDomainError> {
        non_empty(value.into())
            .map(Self)
            .ok_or(TaskGraphDomainError::EmptyGoal)
    }

    /// Returns the goal as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Goal {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short description of a prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Creates a validated label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyLabel`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskGraphDomainError> {
        non_empty(value.into())
            .map(Self)
            .ok_or(TaskGraphDomainError::EmptyLabel)
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == raw.len() {
        return Some(raw);
    }
    Some(trimmed.to_owned())
}
