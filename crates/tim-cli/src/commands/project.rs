//! Project command for managing projects and their tasks.

use std::io::Write;

use anyhow::{Context, Result};
use tim_core::{Project, ProjectTable, Task};
use tim_store::JsonStore;

use crate::{Config, ProjectAction};

/// Runs a project subcommand against the project store.
pub fn run<W: Write>(writer: &mut W, config: &Config, action: &ProjectAction) -> Result<()> {
    let store = JsonStore::new(config.project_table_path());
    let mut projects: ProjectTable = store
        .load_or_default()
        .context("failed to load project table")?;

    match action {
        ProjectAction::List => list(writer, &projects)?,
        ProjectAction::New { id, name } => {
            projects.add(Project::new(*id, name.clone()));
            store.save(&projects).context("failed to save project table")?;
            writeln!(writer, "Added project {id}) {name}")?;
        }
        ProjectAction::Delete { id } => match projects.remove(*id) {
            Ok(project) => {
                store.save(&projects).context("failed to save project table")?;
                writeln!(writer, "Deleted project {}) {}", project.id, project.name)?;
            }
            Err(err) => writeln!(writer, "Nothing deleted: {err}.")?,
        },
        ProjectAction::Add {
            project_id,
            task_id,
            name,
        } => {
            let Some(project) = projects.get_mut(*project_id) else {
                writeln!(writer, "No project with id {project_id}.")?;
                return Ok(());
            };
            project.add_task(Task::new(*task_id, name.clone()));
            let project_name = project.name.clone();
            store.save(&projects).context("failed to save project table")?;
            writeln!(writer, "Added task {task_id} - {name} to {project_name}")?;
        }
    }

    Ok(())
}

/// Writes every project followed by its indented tasks.
pub fn list<W: Write>(writer: &mut W, projects: &ProjectTable) -> Result<()> {
    if projects.is_empty() {
        writeln!(writer, "No projects defined yet.")?;
        return Ok(());
    }

    for project in projects.list() {
        writeln!(writer, "{}) {}", project.id, project.name)?;
        for task in project.tasks() {
            writeln!(writer, "  {} - {}", task.id, task.name)?;
        }
    }
    Ok(())
}
