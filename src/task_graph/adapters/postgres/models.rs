//! Diesel row models for task graph persistence.

use super::schema::{prerequisites, task_graphs};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for the `task_graphs` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_graphs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskGraphRow {
    /// Task graph identifier.
    pub id: uuid::Uuid,
    /// Goal text.
    pub goal: String,
}

/// Row for the `prerequisites` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = prerequisites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrerequisiteRow {
    /// Owning task graph.
    pub task_graph_id: uuid::Uuid,
    /// Insertion order within the owning graph.
    pub position: i32,
    /// Prerequisite identifier.
    pub id: uuid::Uuid,
    /// Label text.
    pub label: String,
    /// Lifecycle status.
    pub status: String,
    /// `graph` or `prerequisite`.
    pub parent_kind: String,
    /// Parent node identifier.
    pub parent_id: uuid::Uuid,
    /// Experimentation start, at microsecond precision.
    pub started_at: Option<DateTime<Utc>>,
}
