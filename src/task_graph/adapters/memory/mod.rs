//! In-memory adapters for task graph persistence.

mod task_graph;

pub use task_graph::InMemoryTaskGraphRepository;
