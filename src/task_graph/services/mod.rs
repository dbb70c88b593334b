//! Application services for task graph use cases.

mod commands;

pub use commands::{
    AddPrerequisiteToGraphRequest, AddPrerequisiteToPrerequisiteRequest, PrerequisiteCommand,
    StartTaskRequest, TaskGraphService, TaskGraphServiceError, TaskGraphServiceResult,
};
