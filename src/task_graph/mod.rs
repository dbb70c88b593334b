//! Mikado task graphs.
//!
//! A task graph records a refactoring goal together with the prerequisites
//! discovered while working towards it. Each prerequisite moves forward
//! through `todo`, `experimenting`, and finally `done`; the graph is complete
//! once every prerequisite has been committed. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Command handlers in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
