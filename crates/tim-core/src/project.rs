//! Project and task registry.
//!
//! Tasks are only ever addressed through the project that owns them, so
//! they live inside [`Project`] rather than in a table of their own.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

pub type ProjectId = u32;
pub type TaskId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A project and the tasks booked against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Adds a task, replacing any task with the same id in place.
    pub fn add_task(&mut self, task: Task) {
        upsert(&mut self.tasks, task, |t| t.id);
    }

    pub fn remove_task(&mut self, task_id: TaskId) -> Result<Task, RegistryError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(RegistryError::TaskNotFound {
                project_id: self.id,
                task_id,
            })?;
        Ok(self.tasks.remove(index))
    }

    /// Returns the id of the first task named exactly `name`.
    pub fn find_task(&self, name: &str) -> Option<TaskId> {
        self.tasks.iter().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn get_task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Iterates tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

/// All known projects, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTable {
    #[serde(default)]
    table: Vec<Project>,
}

impl ProjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project, replacing any project with the same id in place.
    pub fn add(&mut self, project: Project) {
        tracing::debug!(id = project.id, name = %project.name, "adding project");
        upsert(&mut self.table, project, |p| p.id);
    }

    pub fn remove(&mut self, project_id: ProjectId) -> Result<Project, RegistryError> {
        let index = self
            .table
            .iter()
            .position(|p| p.id == project_id)
            .ok_or(RegistryError::ProjectNotFound(project_id))?;
        Ok(self.table.remove(index))
    }

    /// Returns the id of the first project named exactly `name`.
    pub fn find(&self, name: &str) -> Option<ProjectId> {
        self.table.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// Finds a task by name within one project.
    pub fn find_task(&self, project_id: ProjectId, name: &str) -> Option<TaskId> {
        self.get(project_id)?.find_task(name)
    }

    pub fn get(&self, project_id: ProjectId) -> Option<&Project> {
        self.table.iter().find(|p| p.id == project_id)
    }

    pub fn get_mut(&mut self, project_id: ProjectId) -> Option<&mut Project> {
        self.table.iter_mut().find(|p| p.id == project_id)
    }

    pub fn get_task(&self, project_id: ProjectId, task_id: TaskId) -> Option<&Task> {
        self.get(project_id)?.get_task(task_id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Project> {
        self.table.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn upsert<T>(entries: &mut Vec<T>, entry: T, id: impl Fn(&T) -> u32) {
    let key = id(&entry);
    match entries.iter_mut().find(|existing| id(existing) == key) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}
