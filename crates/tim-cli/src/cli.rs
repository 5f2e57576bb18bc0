//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tim_core::{EventKey, ProjectId, TaskId};

/// Tool for time logging.
///
/// Keeps a registry of projects, tasks and reusable events, and one log of
/// timed intervals per day.
#[derive(Debug, Parser)]
#[command(name = "tim", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// The interface for working with projects.
    #[command(subcommand)]
    Project(ProjectAction),

    /// The interface for working with events.
    #[command(subcommand)]
    Event(EventAction),

    /// The interface for working with logs.
    #[command(subcommand)]
    Log(LogAction),
}

#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// List projects and their respective tasks.
    List,

    /// Add a new project.
    New {
        /// The id of the project.
        id: ProjectId,
        /// The name of the project.
        name: String,
    },

    /// Delete an existing project.
    Delete {
        /// The id of the project to delete.
        id: ProjectId,
    },

    /// Add a task to a project.
    Add {
        /// The project id to add the task to.
        project_id: ProjectId,
        /// The id of the task to add.
        task_id: TaskId,
        /// The name of the task to add.
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum EventAction {
    /// List currently defined events.
    List,

    /// Add an event definition.
    Add {
        /// The project for the event.
        project_id: ProjectId,
        /// The task id for the event.
        task_id: TaskId,
        /// The description of the event.
        description: String,
    },

    /// Delete an event definition.
    Delete {
        /// The id of the event to delete.
        id: EventKey,
    },
}

#[derive(Debug, Subcommand)]
pub enum LogAction {
    /// List the currently created logs.
    List,

    /// Start a new log for today.
    Start {
        /// The initial event to start with.
        #[arg(long)]
        event: Option<EventKey>,

        /// Replace today's log if one already exists.
        #[arg(long)]
        force: bool,
    },

    /// Show the current values in the log.
    Show {
        /// The date (YYYY-MM-DD) of the log to show. Defaults to the latest.
        #[arg(long)]
        log: Option<String>,
    },

    /// Delete the specified log.
    Delete {
        /// The date (YYYY-MM-DD) of the log to delete.
        log: String,
    },

    /// Stop the current log, fixing its final time.
    Stop,

    /// Export the latest log as CSV.
    Export,

    /// Add a new event to the end of the latest log.
    Add {
        /// The event id to add.
        event: EventKey,
    },

    /// Edit a part of the latest log.
    #[command(subcommand)]
    Edit(EditAction),
}

#[derive(Debug, Subcommand)]
pub enum EditAction {
    /// Edit the time fields of a marker.
    Time {
        /// The position of the time to edit in the log.
        position: usize,
        /// The year value to update to.
        #[arg(long)]
        year: Option<i32>,
        /// The month value to update to.
        #[arg(long)]
        month: Option<u32>,
        /// The day value to update to.
        #[arg(long)]
        day: Option<u32>,
        /// The hour value to update to.
        #[arg(long)]
        hour: Option<u32>,
        /// The minute value to update to.
        #[arg(long)]
        minute: Option<u32>,
    },

    /// Edit the event of an interval.
    Event {
        /// The position of the event to edit.
        position: usize,
        /// The event to update to.
        id: EventKey,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_time_flags() {
        let cli = Cli::parse_from(["tim", "log", "edit", "time", "0", "--hour", "9", "--minute", "30"]);
        let Some(Commands::Log(LogAction::Edit(EditAction::Time {
            position,
            hour,
            minute,
            year,
            ..
        }))) = cli.command
        else {
            panic!("expected log edit time");
        };
        assert_eq!(position, 0);
        assert_eq!(hour, Some(9));
        assert_eq!(minute, Some(30));
        assert_eq!(year, None);
    }

    #[test]
    fn parses_log_start_event() {
        let cli = Cli::parse_from(["tim", "log", "start", "--event", "4"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Log(LogAction::Start {
                event: Some(4),
                force: false
            }))
        ));
    }
}
