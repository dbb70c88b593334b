//! Command handlers for the Mikado workflow.
//!
//! Every handler loads the aggregate, invokes exactly one aggregate method,
//! persists the result, and returns the refreshed view. Business rules stay
//! in the domain; errors propagate untranslated.

use crate::task_graph::{
    domain::{
        PrerequisiteId, PrerequisiteStatus, TaskGraph, TaskGraphDomainError, TaskGraphId,
        TaskGraphView,
    },
    ports::{TaskGraphRepository, TaskGraphRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for starting a new task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTaskRequest {
    task_graph_id: TaskGraphId,
    goal: String,
}

impl StartTaskRequest {
    /// Creates a request for a graph with the caller-allocated identifier.
    #[must_use]
    pub fn new(task_graph_id: TaskGraphId, goal: impl Into<String>) -> Self {
        Self {
            task_graph_id,
            goal: goal.into(),
        }
    }
}

/// Request payload for adding a prerequisite directly under a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPrerequisiteToGraphRequest {
    task_graph_id: TaskGraphId,
    prerequisite_id: PrerequisiteId,
    label: String,
}

impl AddPrerequisiteToGraphRequest {
    /// Creates a request with a caller-allocated prerequisite identifier.
    #[must_use]
    pub fn new(
        task_graph_id: TaskGraphId,
        prerequisite_id: PrerequisiteId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            task_graph_id,
            prerequisite_id,
            label: label.into(),
        }
    }
}

/// Request payload for adding a prerequisite under another prerequisite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPrerequisiteToPrerequisiteRequest {
    task_graph_id: TaskGraphId,
    prerequisite_id: PrerequisiteId,
    parent_id: PrerequisiteId,
    label: String,
}

impl AddPrerequisiteToPrerequisiteRequest {
    /// Creates a request with a caller-allocated prerequisite identifier.
    #[must_use]
    pub fn new(
        task_graph_id: TaskGraphId,
        prerequisite_id: PrerequisiteId,
        parent_id: PrerequisiteId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            task_graph_id,
            prerequisite_id,
            parent_id,
            label: label.into(),
        }
    }
}

/// Addresses one prerequisite of one graph, for status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrerequisiteCommand {
    task_graph_id: TaskGraphId,
    prerequisite_id: PrerequisiteId,
}

impl PrerequisiteCommand {
    /// Creates a command targeting `prerequisite_id` in `task_graph_id`.
    #[must_use]
    pub const fn new(task_graph_id: TaskGraphId, prerequisite_id: PrerequisiteId) -> Self {
        Self {
            task_graph_id,
            prerequisite_id,
        }
    }
}

/// Service-level errors for task graph operations.
#[derive(Debug, Error)]
pub enum TaskGraphServiceError {
    /// Validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] TaskGraphDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskGraphRepositoryError),
}

impl TaskGraphServiceError {
    /// Returns `true` when the graph or the prerequisite does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Domain(TaskGraphDomainError::PrerequisiteNotFound(_))
                | Self::Repository(TaskGraphRepositoryError::UnknownTaskGraph(_))
        )
    }
}

/// Result type for task graph service operations.
pub type TaskGraphServiceResult<T> = Result<T, TaskGraphServiceError>;

/// Task graph command handlers.
#[derive(Clone)]
pub struct TaskGraphService<R, C>
where
    R: TaskGraphRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskGraphService<R, C>
where
    R: TaskGraphRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task graph service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Starts a task graph for a new goal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] for an empty goal, or
    /// [`TaskGraphServiceError::Repository`] when storing fails.
    pub async fn start_task(
        &self,
        request: StartTaskRequest,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let graph = TaskGraph::start(request.task_graph_id, request.goal)
            .inspect_err(|err| log_rejection(request.task_graph_id, "start_task", err))?;
        self.repository.add(&graph).await?;
        tracing::info!(task_graph_id = %graph.id(), "task graph started");
        Ok(graph.render())
    }

    /// Adds a prerequisite directly under the goal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] for an empty label, or
    /// [`TaskGraphServiceError::Repository`] for an unknown graph.
    pub async fn add_prerequisite_to_graph(
        &self,
        request: AddPrerequisiteToGraphRequest,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let AddPrerequisiteToGraphRequest {
            task_graph_id,
            prerequisite_id,
            label,
        } = request;
        let view = self
            .mutate(task_graph_id, "add_prerequisite_to_graph", |graph| {
                graph.add_prerequisite(prerequisite_id, label)
            })
            .await?;
        tracing::info!(
            task_graph_id = %task_graph_id,
            prerequisite_id = %prerequisite_id,
            status = %PrerequisiteStatus::Todo,
            "prerequisite added to goal"
        );
        Ok(view)
    }

    /// Adds a prerequisite under an existing prerequisite.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] for an empty label, or
    /// [`TaskGraphServiceError::Repository`] for an unknown graph.
    pub async fn add_prerequisite_to_prerequisite(
        &self,
        request: AddPrerequisiteToPrerequisiteRequest,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let AddPrerequisiteToPrerequisiteRequest {
            task_graph_id,
            prerequisite_id,
            parent_id,
            label,
        } = request;
        let view = self
            .mutate(task_graph_id, "add_prerequisite_to_prerequisite", |graph| {
                graph.add_prerequisite_to_prerequisite(prerequisite_id, parent_id, label)
            })
            .await?;
        tracing::info!(
            task_graph_id = %task_graph_id,
            prerequisite_id = %prerequisite_id,
            parent_id = %parent_id,
            status = %PrerequisiteStatus::Todo,
            "prerequisite added to prerequisite"
        );
        Ok(view)
    }

    /// Starts experimenting on a `todo` prerequisite at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] when the prerequisite is
    /// unknown or not `todo`, or [`TaskGraphServiceError::Repository`] for an
    /// unknown graph.
    pub async fn start_experimentation(
        &self,
        command: PrerequisiteCommand,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let PrerequisiteCommand {
            task_graph_id,
            prerequisite_id,
        } = command;
        let clock = &*self.clock;
        let view = self
            .mutate(task_graph_id, "start_experimentation", |graph| {
                graph.start_experimentation(prerequisite_id, clock)
            })
            .await?;
        tracing::info!(
            task_graph_id = %task_graph_id,
            prerequisite_id = %prerequisite_id,
            status = %PrerequisiteStatus::Experimenting,
            "experimentation started"
        );
        Ok(view)
    }

    /// Commits the changes of an `experimenting` prerequisite.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Domain`] when the prerequisite is
    /// unknown or not `experimenting`, or
    /// [`TaskGraphServiceError::Repository`] for an unknown graph.
    pub async fn commit_changes(
        &self,
        command: PrerequisiteCommand,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let PrerequisiteCommand {
            task_graph_id,
            prerequisite_id,
        } = command;
        let view = self
            .mutate(task_graph_id, "commit_changes", |graph| {
                graph.commit_changes(prerequisite_id)
            })
            .await?;
        tracing::info!(
            task_graph_id = %task_graph_id,
            prerequisite_id = %prerequisite_id,
            status = %PrerequisiteStatus::Done,
            done = view.done,
            "changes committed"
        );
        Ok(view)
    }

    /// Returns the flat view of a task graph.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphServiceError::Repository`] for an unknown graph.
    pub async fn get_by_id(
        &self,
        task_graph_id: TaskGraphId,
    ) -> TaskGraphServiceResult<TaskGraphView> {
        let graph = self.repository.get(task_graph_id).await?;
        Ok(graph.render())
    }

    async fn mutate<F>(
        &self,
        task_graph_id: TaskGraphId,
        operation: &'static str,
        apply: F,
    ) -> TaskGraphServiceResult<TaskGraphView>
    where
        F: FnOnce(&mut TaskGraph) -> Result<(), TaskGraphDomainError> + Send,
    {
        tracing::debug!(task_graph_id = %task_graph_id, operation, "loading task graph");
        let mut graph = self.repository.get(task_graph_id).await?;
        apply(&mut graph).inspect_err(|err| log_rejection(task_graph_id, operation, err))?;
        self.repository.update(&graph).await?;
        Ok(graph.render())
    }
}

fn log_rejection(task_graph_id: TaskGraphId, operation: &'static str, err: &TaskGraphDomainError) {
    tracing::warn!(
        task_graph_id = %task_graph_id,
        operation,
        error = %err,
        "task graph command rejected"
    );
}
