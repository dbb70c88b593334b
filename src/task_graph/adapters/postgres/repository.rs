//! `PostgreSQL` repository implementation for task graph storage.

use super::{
    models::{PrerequisiteRow, TaskGraphRow},
    schema::{prerequisites, task_graphs},
};
use crate::config::PersistenceConfig;
use crate::task_graph::{
    domain::{
        Goal, Label, NodeId, PersistedPrerequisiteData, PersistedTaskGraphData, Prerequisite,
        PrerequisiteId, PrerequisiteStatus, TaskGraph, TaskGraphId,
    },
    ports::{TaskGraphRepository, TaskGraphRepositoryError, TaskGraphRepositoryResult},
};
use async_trait::async_trait;
use chrono::SubsecRound;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by task graph adapters.
pub type TaskGraphPgPool = Pool<ConnectionManager<PgConnection>>;

const PARENT_KIND_GRAPH: &str = "graph";
const PARENT_KIND_PREREQUISITE: &str = "prerequisite";
const TIMESTAMP_DIGITS: u16 = 6;

/// `PostgreSQL`-backed task graph repository.
///
/// A graph is written as one `task_graphs` row plus one `prerequisites` row
/// per prerequisite, keyed by its position in the graph. Updates rewrite the
/// prerequisite rows inside a single transaction.
///
/// `started_at` is stored with microsecond precision, so a graph stamped by a
/// nanosecond clock reads back truncated and no longer `equals` the value
/// that was written.
#[derive(Debug, Clone)]
pub struct PostgresTaskGraphRepository {
    pool: TaskGraphPgPool,
}

/// A stored row that cannot be mapped back into the domain.
#[derive(Debug, Error)]
enum RowError {
    #[error("unknown parent kind: {0}")]
    UnknownParentKind(String),
    #[error("invalid stored text for prerequisite {0}")]
    InvalidText(uuid::Uuid),
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Diesel(DieselError),
    Unknown(TaskGraphId),
}

impl From<DieselError> for WriteError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<WriteError> for TaskGraphRepositoryError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Diesel(inner) => Self::persistence(inner),
            WriteError::Unknown(id) => Self::UnknownTaskGraph(id),
        }
    }
}

impl PostgresTaskGraphRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskGraphPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphRepositoryError::Persistence`] when the pool
    /// cannot open its initial connections.
    pub fn connect(config: &PersistenceConfig) -> TaskGraphRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(config.connection_timeout())
            .build(manager)
            .map_err(TaskGraphRepositoryError::persistence)?;
        tracing::info!(
            max_pool_size = config.max_pool_size,
            "connected task graph repository to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskGraphRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskGraphRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskGraphRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskGraphRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskGraphRepository for PostgresTaskGraphRepository {
    async fn get(&self, id: TaskGraphId) -> TaskGraphRepositoryResult<TaskGraph> {
        self.run_blocking(move |connection| {
            let graph_row = task_graphs::table
                .filter(task_graphs::id.eq(id.into_inner()))
                .select(TaskGraphRow::as_select())
                .first::<TaskGraphRow>(connection)
                .optional()
                .map_err(TaskGraphRepositoryError::persistence)?
                .ok_or(TaskGraphRepositoryError::UnknownTaskGraph(id))?;

            let prerequisite_rows = prerequisites::table
                .filter(prerequisites::task_graph_id.eq(id.into_inner()))
                .order(prerequisites::position.asc())
                .select(PrerequisiteRow::as_select())
                .load::<PrerequisiteRow>(connection)
                .map_err(TaskGraphRepositoryError::persistence)?;

            rows_to_task_graph(graph_row, prerequisite_rows)
        })
        .await
    }

    async fn add(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()> {
        let (graph_row, prerequisite_rows) = to_rows(graph)?;
        tracing::debug!(task_graph_id = %graph.id(), "inserting task graph");

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    diesel::insert_into(task_graphs::table)
                        .values(&graph_row)
                        .execute(tx)?;
                    insert_prerequisites(tx, &prerequisite_rows)?;
                    Ok(())
                })
                .map_err(TaskGraphRepositoryError::from)
        })
        .await
    }

    async fn update(&self, graph: &TaskGraph) -> TaskGraphRepositoryResult<()> {
        let id = graph.id();
        let (graph_row, prerequisite_rows) = to_rows(graph)?;
        tracing::debug!(task_graph_id = %id, "rewriting task graph");

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    let updated = diesel::update(task_graphs::table.find(graph_row.id))
                        .set(task_graphs::goal.eq(graph_row.goal.as_str()))
                        .execute(tx)?;
                    if updated == 0 {
                        return Err(WriteError::Unknown(id));
                    }
                    diesel::delete(
                        prerequisites::table.filter(prerequisites::task_graph_id.eq(graph_row.id)),
                    )
                    .execute(tx)?;
                    insert_prerequisites(tx, &prerequisite_rows)?;
                    Ok(())
                })
                .map_err(TaskGraphRepositoryError::from)
        })
        .await
    }
}

fn insert_prerequisites(
    connection: &mut PgConnection,
    rows: &[PrerequisiteRow],
) -> Result<(), DieselError> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(prerequisites::table)
        .values(rows)
        .execute(connection)?;
    Ok(())
}

fn to_rows(graph: &TaskGraph) -> TaskGraphRepositoryResult<(TaskGraphRow, Vec<PrerequisiteRow>)> {
    let task_graph_id = graph.id().into_inner();
    let prerequisite_rows = graph
        .prerequisites()
        .iter()
        .enumerate()
        .map(|(index, prerequisite)| {
            let position = i32::try_from(index).map_err(TaskGraphRepositoryError::persistence)?;
            Ok(to_prerequisite_row(task_graph_id, position, prerequisite))
        })
        .collect::<TaskGraphRepositoryResult<Vec<_>>>()?;

    let graph_row = TaskGraphRow {
        id: task_graph_id,
        goal: graph.goal().as_str().to_owned(),
    };
    Ok((graph_row, prerequisite_rows))
}

fn to_prerequisite_row(
    task_graph_id: uuid::Uuid,
    position: i32,
    prerequisite: &Prerequisite,
) -> PrerequisiteRow {
    let parent_kind = match prerequisite.parent_id() {
        NodeId::Graph(_) => PARENT_KIND_GRAPH,
        NodeId::Prerequisite(_) => PARENT_KIND_PREREQUISITE,
    };

    PrerequisiteRow {
        task_graph_id,
        position,
        id: prerequisite.id().into_inner(),
        label: prerequisite.label().as_str().to_owned(),
        status: prerequisite.status().as_str().to_owned(),
        parent_kind: parent_kind.to_owned(),
        parent_id: prerequisite.parent_id().as_uuid(),
        started_at: prerequisite
            .started_at()
            .map(|instant| instant.trunc_subsecs(TIMESTAMP_DIGITS)),
    }
}

fn rows_to_task_graph(
    graph_row: TaskGraphRow,
    prerequisite_rows: Vec<PrerequisiteRow>,
) -> TaskGraphRepositoryResult<TaskGraph> {
    let goal = Goal::new(graph_row.goal).map_err(TaskGraphRepositoryError::persistence)?;
    let prerequisites = prerequisite_rows
        .into_iter()
        .map(row_to_prerequisite)
        .collect::<TaskGraphRepositoryResult<Vec<_>>>()?;

    Ok(TaskGraph::from_persisted(PersistedTaskGraphData {
        id: TaskGraphId::from_uuid(graph_row.id),
        goal,
        prerequisites,
    }))
}

fn row_to_prerequisite(row: PrerequisiteRow) -> TaskGraphRepositoryResult<Prerequisite> {
    let PrerequisiteRow {
        id,
        label: persisted_label,
        status: persisted_status,
        parent_kind,
        parent_id,
        started_at,
        ..
    } = row;

    let parent_id = match parent_kind.as_str() {
        PARENT_KIND_GRAPH => NodeId::Graph(TaskGraphId::from_uuid(parent_id)),
        PARENT_KIND_PREREQUISITE => NodeId::Prerequisite(PrerequisiteId::from_uuid(parent_id)),
        _ => {
            return Err(TaskGraphRepositoryError::persistence(
                RowError::UnknownParentKind(parent_kind),
            ));
        }
    };
    let label = Label::new(persisted_label)
        .map_err(|_| TaskGraphRepositoryError::persistence(RowError::InvalidText(id)))?;
    let status = PrerequisiteStatus::try_from(persisted_status.as_str())
        .map_err(TaskGraphRepositoryError::persistence)?;

    Ok(Prerequisite::from_persisted(PersistedPrerequisiteData {
        id: PrerequisiteId::from_uuid(id),
        label,
        status,
        parent_id,
        started_at,
    }))
}
