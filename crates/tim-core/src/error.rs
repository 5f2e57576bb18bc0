//! Error types for the domain model.

use thiserror::Error;

use crate::event::EventKey;
use crate::project::{ProjectId, TaskId};

/// Errors raised by daily log operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The log's final time marker is already fixed.
    #[error("log is already stopped")]
    Closed,

    /// A position did not address an existing time marker or event.
    #[error("no {kind} at position {position} (log has {len})")]
    PositionOutOfRange {
        kind: &'static str,
        position: usize,
        len: usize,
    },

    /// An edit would produce a date or time that does not exist.
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    /// An event reference points at no known definition.
    #[error("unknown event: {0}")]
    UnknownEvent(EventKey),

    /// Persisted log data does not satisfy the times/events alignment.
    #[error("log has {times} time markers for {events} events")]
    Misaligned { times: usize, events: usize },
}

/// Errors raised by project and task registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("task {task_id} not found in project {project_id}")]
    TaskNotFound { project_id: ProjectId, task_id: TaskId },

    /// A stored event counter is behind a key already in use.
    #[error("event counter {last_key} is behind existing key {max_key}")]
    StaleEventCounter { last_key: EventKey, max_key: EventKey },

    #[error("no event keys left")]
    EventKeysExhausted,
}
