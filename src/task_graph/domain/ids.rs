//! Identifier types for the task graph domain.
//!
//! Identifiers are always allocated by the caller. The aggregate only stores
//! and compares them.

use super::TaskGraphDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGraphId(Uuid);

impl TaskGraphId {
    /// Creates a new random task graph identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task graph identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskGraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskGraphId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskGraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskGraphId {
    type Err = TaskGraphDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_uuid(value).map(Self)
    }
}

/// Unique identifier for a prerequisite within a task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrerequisiteId(Uuid);

impl PrerequisiteId {
    /// Creates a new random prerequisite identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a prerequisite identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for PrerequisiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for PrerequisiteId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PrerequisiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrerequisiteId {
    type Err = TaskGraphDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_uuid(value).map(Self)
    }
}

/// A node a prerequisite can hang under: the goal itself or another
/// prerequisite.
///
/// This is a lookup key only. The graph does not check that the node exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NodeId {
    /// The goal node of a task graph.
    Graph(TaskGraphId),
    /// Another prerequisite.
    Prerequisite(PrerequisiteId),
}

impl NodeId {
    /// Returns the UUID of the referenced node regardless of its kind.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        match self {
            Self::Graph(id) => id.into_inner(),
            Self::Prerequisite(id) => id.into_inner(),
        }
    }
}

impl From<TaskGraphId> for NodeId {
    fn from(id: TaskGraphId) -> Self {
        Self::Graph(id)
    }
}

impl From<PrerequisiteId> for NodeId {
    fn from(id: PrerequisiteId) -> Self {
        Self::Prerequisite(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_uuid())
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, TaskGraphDomainError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| TaskGraphDomainError::InvalidIdentifier(value.to_owned()))
}
