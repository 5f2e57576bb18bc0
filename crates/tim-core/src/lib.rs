//! Core domain logic for the tim time log.
//!
//! This crate contains the fundamental types and logic for:
//! - Time markers: fixed or floating boundaries of an interval
//! - Registries: projects with their tasks, and reusable event definitions
//! - Daily logs: interval bookkeeping, timeline rendering and CSV export

mod error;
pub mod event;
pub mod log;
pub mod project;
mod render;
pub mod time;

pub use error::{LogError, RegistryError};
pub use event::{EventDefinition, EventKey, EventRef, EventTable};
pub use log::{DATE_KEY_FORMAT, Interval, Tim};
pub use project::{Project, ProjectId, ProjectTable, Task, TaskId};
pub use render::EXPORT_HEADER;
pub use time::{TimeFields, TimeMarker, Timestamp};
