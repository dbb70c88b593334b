//! Prerequisites owned by a task graph.

use super::{Label, NodeId, PrerequisiteId, PrerequisiteStatus, TaskGraphDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task that must be finished before its parent node can be.
///
/// Prerequisites are value objects inside the [`super::TaskGraph`] aggregate
/// and can only change status through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisite {
    id: PrerequisiteId,
    label: Label,
    status: PrerequisiteStatus,
    parent_id: NodeId,
    started_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted prerequisite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPrerequisiteData {
    /// Persisted prerequisite identifier.
    pub id: PrerequisiteId,
    /// Persisted label.
    pub label: Label,
    /// Persisted lifecycle status.
    pub status: PrerequisiteStatus,
    /// Persisted parent link.
    pub parent_id: NodeId,
    /// Persisted experimentation start, if any.
    pub started_at: Option<DateTime<Utc>>,
}

impl Prerequisite {
    pub(super) const fn new(id: PrerequisiteId, parent_id: NodeId, label: Label) -> Self {
        Self {
            id,
            label,
            status: PrerequisiteStatus::Todo,
            parent_id,
            started_at: None,
        }
    }

    /// Reconstructs a prerequisite from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPrerequisiteData) -> Self {
        Self {
            id: data.id,
            label: data.label,
            status: data.status,
            parent_id: data.parent_id,
            started_at: data.started_at,
        }
    }

    /// Returns the prerequisite identifier.
    #[must_use]
    pub const fn id(&self) -> PrerequisiteId {
        self.id
    }

    /// Returns the label.
    #[must_use]
    pub const fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PrerequisiteStatus {
        self.status
    }

    /// Returns the node this prerequisite was added under.
    #[must_use]
    pub const fn parent_id(&self) -> NodeId {
        self.parent_id
    }

    /// Returns when experimentation began. Kept once set.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns `true` once the change has been committed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == PrerequisiteStatus::Done
    }

    pub(super) fn start_experimentation(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), TaskGraphDomainError> {
        self.transition_to(PrerequisiteStatus::Experimenting)?;
        self.started_at = Some(now);
        Ok(())
    }

    pub(super) fn commit_changes(&mut self) -> Result<(), TaskGraphDomainError> {
        self.transition_to(PrerequisiteStatus::Done)
    }

    fn transition_to(&mut self, target: PrerequisiteStatus) -> Result<(), TaskGraphDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskGraphDomainError::InvalidTransition {
                prerequisite_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}
