//! Repository tests against the `PostgreSQL` task graph tables.

use super::helpers::{PostgresContext, context, instant};
use chrono::{SubsecRound, TimeZone, Timelike, Utc};
use mikado::task_graph::{
    domain::{FixedClock, NodeId, PrerequisiteId, PrerequisiteStatus, TaskGraph, TaskGraphId},
    ports::{TaskGraphRepository, TaskGraphRepositoryError},
};
use rstest::rstest;

fn nested_graph(id: TaskGraphId, parent: PrerequisiteId, child: PrerequisiteId) -> TaskGraph {
    let mut graph = TaskGraph::start(id, "Rework that part").expect("valid goal");
    graph
        .add_prerequisite(parent, "Change that")
        .expect("valid label");
    graph
        .add_prerequisite_to_prerequisite(child, parent, "Extract this first")
        .expect("valid label");
    graph
        .start_experimentation(child, &FixedClock::new(instant()))
        .expect("todo prerequisite");
    graph
}

#[rstest]
fn get_unknown_graph_reports_its_id(context: PostgresContext) {
    let missing = TaskGraphId::new();

    let result = context.rt.block_on(context.repository.get(missing));

    assert!(matches!(
        result,
        Err(TaskGraphRepositoryError::UnknownTaskGraph(id)) if id == missing
    ));
}

#[rstest]
fn added_graph_reads_back_equal(context: PostgresContext) {
    let id = TaskGraphId::new();
    let parent = PrerequisiteId::new();
    let child = PrerequisiteId::new();
    let graph = nested_graph(id, parent, child);

    context
        .rt
        .block_on(context.repository.add(&graph))
        .expect("add should succeed");
    let fetched = context
        .rt
        .block_on(context.repository.get(id))
        .expect("graph should exist");

    assert!(fetched.equals(&graph));
    assert_eq!(
        fetched.prerequisite(child).map(|p| p.parent_id()),
        Some(NodeId::Prerequisite(parent))
    );
    assert_eq!(
        fetched.prerequisite(child).and_then(|p| p.started_at()),
        Some(instant())
    );
}

#[rstest]
fn update_rewrites_prerequisites_in_insertion_order(context: PostgresContext) {
    let id = TaskGraphId::new();
    let first = PrerequisiteId::new();
    let second = PrerequisiteId::new();
    let third = PrerequisiteId::new();
    let mut graph = TaskGraph::start(id, "Rework that part").expect("valid goal");
    graph.add_prerequisite(first, "Change that").expect("valid label");
    context
        .rt
        .block_on(context.repository.add(&graph))
        .expect("add should succeed");

    graph
        .add_prerequisite_to_prerequisite(second, first, "Extract this first")
        .expect("valid label");
    graph
        .add_prerequisite(third, "Then rename that")
        .expect("valid label");
    graph
        .start_experimentation(second, &FixedClock::new(instant()))
        .expect("todo prerequisite");
    graph.commit_changes(second).expect("experimenting prerequisite");
    context
        .rt
        .block_on(context.repository.update(&graph))
        .expect("update should succeed");

    let fetched = context
        .rt
        .block_on(context.repository.get(id))
        .expect("graph should exist");
    assert!(fetched.equals(&graph));
    assert!(
        fetched
            .prerequisites()
            .iter()
            .map(|p| p.id())
            .eq([first, second, third])
    );
    assert!(
        fetched
            .prerequisites()
            .iter()
            .map(|p| p.status())
            .eq([
                PrerequisiteStatus::Todo,
                PrerequisiteStatus::Done,
                PrerequisiteStatus::Todo
            ])
    );
}

#[rstest]
fn update_of_unknown_graph_reports_its_id(context: PostgresContext) {
    let id = TaskGraphId::new();
    let graph = nested_graph(id, PrerequisiteId::new(), PrerequisiteId::new());

    let result = context.rt.block_on(context.repository.update(&graph));

    assert!(matches!(
        result,
        Err(TaskGraphRepositoryError::UnknownTaskGraph(unknown)) if unknown == id
    ));
    assert!(context.rt.block_on(context.repository.get(id)).is_err());
}

#[rstest]
fn started_at_is_stored_to_the_microsecond(context: PostgresContext) {
    let stamped = Utc
        .with_ymd_and_hms(2023, 7, 25, 10, 24, 0)
        .single()
        .and_then(|at| at.with_nanosecond(123_456_789))
        .expect("valid instant");
    let id = TaskGraphId::new();
    let prerequisite_id = PrerequisiteId::new();
    let mut graph = TaskGraph::start(id, "Rework that part").expect("valid goal");
    graph
        .add_prerequisite(prerequisite_id, "Change that")
        .expect("valid label");
    graph
        .start_experimentation(prerequisite_id, &FixedClock::new(stamped))
        .expect("todo prerequisite");

    context
        .rt
        .block_on(context.repository.add(&graph))
        .expect("add should succeed");
    let fetched = context
        .rt
        .block_on(context.repository.get(id))
        .expect("graph should exist");

    assert_eq!(
        fetched
            .prerequisite(prerequisite_id)
            .and_then(|p| p.started_at()),
        Some(stamped.trunc_subsecs(6))
    );
}

#[rstest]
fn graphs_may_reuse_prerequisite_ids(context: PostgresContext) {
    let shared = PrerequisiteId::new();
    let mut left = TaskGraph::start(TaskGraphId::new(), "Rework that part").expect("valid goal");
    left.add_prerequisite(shared, "Change that").expect("valid label");
    let mut right = TaskGraph::start(TaskGraphId::new(), "Rework this part").expect("valid goal");
    right.add_prerequisite(shared, "Change this").expect("valid label");

    for graph in [&left, &right] {
        context
            .rt
            .block_on(context.repository.add(graph))
            .expect("add should succeed");
    }

    let fetched = context
        .rt
        .block_on(context.repository.get(right.id()))
        .expect("graph should exist");
    assert!(fetched.equals(&right));
}
