//! Unit tests for the task graph bounded context.


use crate::task_graph::domain::{
    FixedClock, Label, NodeId, PersistedPrerequisiteData, PersistedTaskGraphData, Prerequisite,
    PrerequisiteId, PrerequisiteStatus, TaskGraph, TaskGraphId,
};
use chrono::{DateTime, TimeZone, Utc};

/// The instant every deterministic test clock reports.
pub(super) fn experimentation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 7, 25, 10, 24, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn fixed_clock() -> FixedClock {
    FixedClock::new(experimentation_instant())
}

/// Builds a prerequisite hanging under the goal in an arbitrary status.
pub(super) fn prerequisite_with_status(
    graph_id: TaskGraphId,
    id: PrerequisiteId,
    status: PrerequisiteStatus,
) -> Prerequisite {
    let started_at = (status != PrerequisiteStatus::Todo).then(experimentation_instant);
    Prerequisite::from_persisted(PersistedPrerequisiteData {
        id,
        label: Label::new("Change that").expect("valid label"),
        status,
        parent_id: NodeId::Graph(graph_id),
        started_at,
    })
}

/// Builds a graph with the given prerequisites, bypassing the state machine.
pub(super) fn graph_with(id: TaskGraphId, prerequisites: Vec<Prerequisite>) -> TaskGraph {
    TaskGraph::from_persisted(PersistedTaskGraphData {
        id,
        goal: crate::task_graph::domain::Goal::new("Rework that part").expect("valid goal"),
        prerequisites,
    })
}
