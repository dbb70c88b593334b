//! Domain model for Mikado task graphs.
//!
//! The aggregate owns every validation and state transition rule so that
//! each caller, whether a route handler or a command-line front end, gets the
//! same guarantees. Persistence and time live behind ports.

mod clock;
mod error;
mod graph;
mod ids;
mod prerequisite;
mod status;
mod text;
mod view;

pub use clock::FixedClock;
pub use error::{ParsePrerequisiteStatusError, TaskGraphDomainError};
pub use graph::{PersistedTaskGraphData, TaskGraph};
pub use ids::{NodeId, PrerequisiteId, TaskGraphId};
pub use prerequisite::{PersistedPrerequisiteData, Prerequisite};
pub use status::PrerequisiteStatus;
pub use text::{Goal, Label};
pub use view::{PrerequisiteView, TaskGraphView};
