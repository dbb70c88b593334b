//! In-memory repository for task graphs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task_graph::{
    domain::{TaskGraph, TaskGraphId},
    ports::{TaskGraphRepository, TaskGraphRepositoryError, TaskGraphRepositoryResult},
};

/// Thread-safe in-memory task graph repository.
///
/// Graphs are kept in insertion order without an id index, so duplicate
/// identifiers are detectable and reported as unknown rather than resolved.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskGraphRepository {
    graphs: Arc<RwLock<Vec<TaskGraph>>>,
}

impl InMemoryTaskGraphRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with existing graphs.
    #[must_use]
    pub fn with_graphs(graphs: impl IntoIterator<Item = TaskGraph>) -> Self {
        Self {
            graphs: Arc::new(RwLock::new(graphs.into_iter().collect())),
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskGraphRepositoryError {
    TaskGraphRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Returns the position of the only graph identified by `id`.
fn single_match(graphs: &[TaskGraph], id: TaskGraphId) -> TaskGraphRepositoryResult<usize> {
    let mut positions = graphs
        .iter()
        .enumerate()
        .filter(|(_, graph)| graph.identify_by(id))
        .map(|(position, _)| position);

    match (positions.next(), positions.next()) {
        (Some(position), None) => Ok(position),
        _ => Err(TaskGraphRepositoryError::UnknownTaskGraph(id)),
    }
}

#[async_trait]
impl TaskGraphRepository for InMemoryTaskGraphRepository {
    async fn get(&self, id: TaskGraphId) -> TaskGraphRepositoryResult<TaskGraph> {
        let graphs = self.graphs.read().map_err(lock_error)?;
        let position = single_match(&graphs, id)?;
        graphs
            .get(position)
            .cloned()
            .ok_or(TaskGraphRepositoryError::UnknownTaskGraph(id))
    }

    async fn add(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()> {
        let mut graphs = self.graphs.write().map_err(lock_error)?;
        tracing::debug!(task_graph_id = %graph.id(), "storing task graph in memory");
        graphs.push(graph.clone());
        Ok(())
    }

    async fn update(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()> {
        let mut graphs = self.graphs.write().map_err(lock_error)?;
        let position = single_match(&graphs, graph.id())?;
        let slot = graphs
            .get_mut(position)
            .ok_or(TaskGraphRepositoryError::UnknownTaskGraph(graph.id()))?;
        *slot = graph.clone();
        Ok(())
    }
}
