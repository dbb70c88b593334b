//! Repository port for task graph persistence and lookup.

use crate::task_graph::domain::{TaskGraph, TaskGraphId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task graph repository operations.
pub type TaskGraphRepositoryResult<T> = Result<T, TaskGraphRepositoryError>;

/// Task graph persistence contract.
///
/// Implementations serialize their own writes. Concurrent commands against
/// the same graph are not fenced, so the last write wins.
#[async_trait]
pub trait TaskGraphRepository: Send + Sync {
    /// Fetches the task graph with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphRepositoryError::UnknownTaskGraph`] when zero or
    /// several stored graphs match `id`.
    async fn get(&self, id: TaskGraphId) -> TaskGraphRepositoryResult<TaskGraph>;

    /// Appends a new task graph.
    ///
    /// Identifier uniqueness is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphRepositoryError::Persistence`] when storage fails.
    async fn add(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()>;

    /// Replaces a stored task graph with its mutated state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphRepositoryError::UnknownTaskGraph`] when the graph
    /// was never added.
    async fn update(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()>;
}

/// Errors returned by task graph repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskGraphRepositoryError {
    /// No single stored graph matches the identifier.
    #[error("the task graph with the id {0} does not exist")]
    UnknownTaskGraph(TaskGraphId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskGraphRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
