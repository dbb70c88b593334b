//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mikado::task_graph::{
    adapters::postgres::{PostgresTaskGraphRepository, TaskGraphPgPool},
    domain::FixedClock,
    services::TaskGraphService,
};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the task graph tables.
pub const CREATE_TASK_GRAPHS_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_task_graphs/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "mikado_test_template";

/// Service type exercised against `PostgreSQL`.
pub type PostgresService = TaskGraphService<PostgresTaskGraphRepository, FixedClock>;

/// Instant reported by the test clock.
pub fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 7, 25, 10, 24, 0)
        .single()
        .expect("valid instant")
}

/// Creates a tokio runtime for driving the async repository.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_TASK_GRAPHS_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a database from the template and a repository over it.
pub fn setup_repository(
    cluster: &TestCluster,
    db_name: &str,
) -> Result<PostgresTaskGraphRepository, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool: TaskGraphPgPool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(PostgresTaskGraphRepository::new(pool))
}

/// Drops the per-test database, even when the test panics.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            tracing::warn!(db_name = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

/// Repository, service, and runtime over a throwaway database.
///
/// Fields drop in declaration order, so the pool closes before the guard
/// drops the database.
pub struct PostgresContext {
    pub service: PostgresService,
    pub repository: Arc<PostgresTaskGraphRepository>,
    pub rt: Runtime,
    _guard: CleanupGuard<'static>,
}

/// Provides a migrated database with a repository and service over it.
#[fixture]
pub fn context(#[from(shared_test_cluster)] cluster: &'static TestCluster) -> PostgresContext {
    ensure_template(cluster).expect("template setup");
    let db_name = format!("test_task_graph_{}", uuid::Uuid::new_v4().simple());
    let guard = CleanupGuard::new(cluster, db_name.clone());
    let repository = Arc::new(setup_repository(cluster, &db_name).expect("repository setup"));
    let clock = Arc::new(FixedClock::new(instant()));
    let service = TaskGraphService::new(Arc::clone(&repository), clock);
    PostgresContext {
        service,
        repository,
        rt: test_runtime(),
        _guard: guard,
    }
}
