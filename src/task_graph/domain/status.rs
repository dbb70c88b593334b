//! Prerequisite lifecycle status.

use super::ParsePrerequisiteStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single prerequisite.
///
/// The lifecycle is strictly forward: `Todo` to `Experimenting` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteStatus {
    /// Discovered but not yet attempted.
    Todo,
    /// A candidate change is being tried out.
    Experimenting,
    /// The change has been committed.
    Done,
}

impl PrerequisiteStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Experimenting, Self::Done];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Experimenting => "experimenting",
            Self::Done => "done",
        }
    }

    /// Returns `true` when moving from `self` to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Todo, Self::Experimenting) | (Self::Experimenting, Self::Done)
        )
    }

    /// Returns `true` when no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for PrerequisiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PrerequisiteStatus {
    type Error = ParsePrerequisiteStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "experimenting" => Ok(Self::Experimenting),
            "done" => Ok(Self::Done),
            _ => Err(ParsePrerequisiteStatusError(value.to_owned())),
        }
    }
}
