//! Command handlers over the `PostgreSQL` adapter.

use super::helpers::{PostgresContext, context, instant};
use mikado::task_graph::{
    domain::{PrerequisiteId, PrerequisiteStatus, TaskGraphId},
    ports::TaskGraphRepositoryError,
    services::{
        AddPrerequisiteToGraphRequest, PrerequisiteCommand, StartTaskRequest,
        TaskGraphServiceError,
    },
};
use rstest::rstest;

#[rstest]
fn mikado_workflow_reaches_the_goal(context: PostgresContext) {
    let service = &context.service;
    let id = TaskGraphId::new();
    let prerequisite_id = PrerequisiteId::new();

    context
        .rt
        .block_on(service.start_task(StartTaskRequest::new(id, "Rework that part")))
        .expect("start should succeed");
    let added = context
        .rt
        .block_on(service.add_prerequisite_to_graph(AddPrerequisiteToGraphRequest::new(
            id,
            prerequisite_id,
            "Change that",
        )))
        .expect("add should succeed");
    assert_eq!(
        added.prerequisites.first().map(|p| p.status),
        Some(PrerequisiteStatus::Todo)
    );

    let started = context
        .rt
        .block_on(service.start_experimentation(PrerequisiteCommand::new(id, prerequisite_id)))
        .expect("start experimentation should succeed");
    assert_eq!(
        started.prerequisites.first().and_then(|p| p.started_at),
        Some(instant())
    );

    let committed = context
        .rt
        .block_on(service.commit_changes(PrerequisiteCommand::new(id, prerequisite_id)))
        .expect("commit should succeed");
    assert!(committed.done);

    let view = context
        .rt
        .block_on(service.get_by_id(id))
        .expect("graph should exist");
    assert!(view.done);
    assert_eq!(view.goal, "Rework that part");
    assert_eq!(view.prerequisites.len(), 1);
    assert_eq!(
        view.prerequisites.first().map(|p| (p.id, p.status, p.started_at)),
        Some((prerequisite_id, PrerequisiteStatus::Done, Some(instant())))
    );
}

#[rstest]
fn commands_on_unknown_graph_are_not_found(context: PostgresContext) {
    let service = &context.service;
    let missing = TaskGraphId::new();

    let result = context.rt.block_on(
        service.start_experimentation(PrerequisiteCommand::new(missing, PrerequisiteId::new())),
    );

    assert!(matches!(
        &result,
        Err(TaskGraphServiceError::Repository(
            TaskGraphRepositoryError::UnknownTaskGraph(id)
        )) if *id == missing
    ));
    assert!(result.is_err_and(|err| err.is_not_found()));
}
