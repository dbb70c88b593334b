//! Error types for task graph validation and state transitions.

use super::{PrerequisiteId, PrerequisiteStatus};
use thiserror::Error;

/// Errors raised by the task graph aggregate and its value types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskGraphDomainError {
    /// The goal is empty after trimming.
    #[error("the goal cannot be empty")]
    EmptyGoal,

    /// The prerequisite label is empty after trimming.
    #[error("the label cannot be empty")]
    EmptyLabel,

    /// The requested status change is not allowed by the prerequisite
    /// lifecycle.
    #[error("prerequisite {prerequisite_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Prerequisite whose status change was rejected.
        prerequisite_id: PrerequisiteId,
        /// Status at the time of the attempt.
        from: PrerequisiteStatus,
        /// Requested status.
        to: PrerequisiteStatus,
    },

    /// No prerequisite with this identifier belongs to the graph.
    #[error("prerequisite not found: {0}")]
    PrerequisiteNotFound(PrerequisiteId),

    /// An identifier could not be parsed.
    #[error("invalid identifier '{0}', expected a UUID")]
    InvalidIdentifier(String),
}

impl TaskGraphDomainError {
    /// Returns `true` for input defects such as empty goals or labels.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyGoal | Self::EmptyLabel | Self::InvalidIdentifier(_)
        )
    }
}

/// Error returned while parsing prerequisite statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown prerequisite status: {0}")]
pub struct ParsePrerequisiteStatusError(pub String);
