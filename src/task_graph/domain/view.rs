//! Flat, serializable projection of a task graph.

use super::{Prerequisite, PrerequisiteId, PrerequisiteStatus, TaskGraph, TaskGraphId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only snapshot of a task graph handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGraphView {
    /// Task graph identifier.
    pub id: TaskGraphId,
    /// Goal text.
    pub goal: String,
    /// Whether every prerequisite is done.
    pub done: bool,
    /// Prerequisites in insertion order.
    pub prerequisites: Vec<PrerequisiteView>,
}

/// Read-only snapshot of one prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteView {
    /// Prerequisite identifier.
    pub id: PrerequisiteId,
    /// Label text.
    pub label: String,
    /// Lifecycle status.
    pub status: PrerequisiteStatus,
    /// Identifier of the goal or prerequisite this one hangs under.
    pub parent_id: Uuid,
    /// Experimentation start, omitted until experimentation begins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&TaskGraph> for TaskGraphView {
    fn from(graph: &TaskGraph) -> Self {
        Self {
            id: graph.id(),
            goal: graph.goal().as_str().to_owned(),
            done: graph.is_done(),
            prerequisites: graph
                .prerequisites()
                .iter()
                .map(PrerequisiteView::from)
                .collect(),
        }
    }
}

impl From<&Prerequisite> for PrerequisiteView {
    fn from(prerequisite: &Prerequisite) -> Self {
        Self {
            id: prerequisite.id(),
            label: prerequisite.label().as_str().to_owned(),
            status: prerequisite.status(),
            parent_id: prerequisite.parent_id().as_uuid(),
            started_at: prerequisite.started_at(),
        }
    }
}
