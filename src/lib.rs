//! Mikado: task graphs for the Mikado Method.
//!
//! A developer states a goal, discovers the prerequisites that block it,
//! experiments on leaf prerequisites, and commits changes bottom-up until the
//! goal is reached. This crate models that workflow as a task graph
//! aggregate with a forward-only prerequisite state machine.
//!
//! # Architecture
//!
//! Mikado follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task_graph`]: Goals, prerequisites, and the command handlers
//! - [`config`]: Persistence settings

pub mod config;
pub mod task_graph;
