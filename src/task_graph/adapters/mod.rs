//! Adapter implementations of the task graph ports.

pub mod memory;
pub mod postgres;
