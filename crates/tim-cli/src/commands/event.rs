//! Event command for managing reusable event definitions.

use std::io::Write;

use anyhow::{Context, Result};
use tim_core::{EventDefinition, EventTable, ProjectTable};
use tim_store::JsonStore;

use crate::{Config, EventAction};

/// Runs an event subcommand against the event store.
pub fn run<W: Write>(writer: &mut W, config: &Config, action: &EventAction) -> Result<()> {
    let store = JsonStore::new(config.event_table_path());
    let mut events: EventTable = store
        .load_or_default()
        .context("failed to load event table")?;

    match action {
        EventAction::List => {
            let projects: ProjectTable = JsonStore::new(config.project_table_path())
                .load_or_default()
                .context("failed to load project table")?;
            list(writer, &events, &projects)?;
        }
        EventAction::Add {
            project_id,
            task_id,
            description,
        } => {
            let key = events
                .add(EventDefinition::new(
                    *project_id,
                    *task_id,
                    description.clone(),
                ))
                .context("failed to add event")?;
            store.save(&events).context("failed to save event table")?;
            writeln!(writer, "Added event {key}) {description}")?;
        }
        EventAction::Delete { id } => {
            if let Some(definition) = events.remove(*id) {
                store.save(&events).context("failed to save event table")?;
                writeln!(writer, "Deleted event {id}) {}", definition.description)?;
            } else {
                writeln!(writer, "No event with id {id}.")?;
            }
        }
    }

    Ok(())
}

/// Writes every event with its project and task names.
///
/// Events whose project or task no longer exists get a diagnostic line
/// instead.
pub fn list<W: Write>(writer: &mut W, events: &EventTable, projects: &ProjectTable) -> Result<()> {
    if events.is_empty() {
        writeln!(writer, "No events defined yet.")?;
        return Ok(());
    }

    for (key, event) in events.list() {
        let Some(project) = projects.get(event.project_id) else {
            writeln!(
                writer,
                "No project {} associated with event {key}: {}",
                event.project_id, event.description
            )?;
            continue;
        };
        let Some(task) = project.get_task(event.task_id) else {
            writeln!(
                writer,
                "Task {} not associated with project {}) {}.",
                event.task_id, project.id, project.name
            )?;
            continue;
        };
        writeln!(
            writer,
            "{key}) {} - {}: {}",
            project.name, task.name, event.description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tim_core::{Project, Task};

    fn run_to_string(config: &Config, action: &EventAction) -> String {
        let mut output = Vec::new();
        run(&mut output, config, action).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn add(config: &Config, project_id: u32, task_id: u32, description: &str) -> String {
        run_to_string(
            config,
            &EventAction::Add {
                project_id,
                task_id,
                description: description.to_string(),
            },
        )
    }

    #[test]
    fn deleted_keys_are_not_reused() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
        };

        assert_eq!(add(&config, 1, 1, "coding"), "Added event 1) coding\n");
        assert_eq!(
            run_to_string(&config, &EventAction::Delete { id: 1 }),
            "Deleted event 1) coding\n"
        );
        assert_eq!(add(&config, 1, 2, "testing"), "Added event 2) testing\n");
        assert_eq!(
            run_to_string(&config, &EventAction::Delete { id: 1 }),
            "No event with id 1.\n"
        );
    }

    #[test]
    fn list_reports_dangling_references() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
        };

        let mut projects = ProjectTable::new();
        let mut project = Project::new(5, "Acme");
        project.add_task(Task::new(1, "Support"));
        projects.add(project);
        JsonStore::new(config.project_table_path())
            .save(&projects)
            .unwrap();

        add(&config, 5, 1, "ticket queue");
        add(&config, 5, 9, "mystery task");
        add(&config, 8, 1, "old client");

        let output = run_to_string(&config, &EventAction::List);
        assert_snapshot!(output, @r"
        1) Acme - Support: ticket queue
        Task 9 not associated with project 5) Acme.
        No project 8 associated with event 3: old client
        ");
    }

    #[test]
    fn stale_counter_on_disk_is_refused() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
        };
        std::fs::write(
            config.event_table_path(),
            r#"{"version": 1, "data": {
                "table": {"1": {"project_id": 1, "task_id": 1, "description": "coding"}},
                "last_key": 0
            }}"#,
        )
        .unwrap();

        let mut output = Vec::new();
        let action = EventAction::Add {
            project_id: 1,
            task_id: 2,
            description: "testing".to_string(),
        };
        let err = run(&mut output, &config, &action).unwrap_err();
        assert!(format!("{err:#}").contains("event counter 0 is behind existing key 1"));
        assert!(output.is_empty());
    }

    #[test]
    fn list_on_first_run_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
        };
        assert_eq!(
            run_to_string(&config, &EventAction::List),
            "No events defined yet.\n"
        );
    }
}
