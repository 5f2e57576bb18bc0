//! Event definitions and the log-local references to them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::project::{ProjectId, ProjectTable, TaskId};

/// Key of an [`EventDefinition`] in the [`EventTable`].
pub type EventKey = u32;

/// A reusable labeled activity: what was worked on, not when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub description: String,
}

impl EventDefinition {
    pub fn new(project_id: ProjectId, task_id: TaskId, description: impl Into<String>) -> Self {
        Self {
            project_id,
            task_id,
            description: description.into(),
        }
    }

    /// Renders `"<project> - <task> | <description>"`.
    ///
    /// Dangling project or task ids are rendered as `Unknown project <id>`
    /// and `Unknown task <id>`.
    pub fn label(&self, projects: &ProjectTable) -> String {
        let project = projects.get(self.project_id);
        let project_name = project.map_or_else(
            || format!("Unknown project {}", self.project_id),
            |p| p.name.clone(),
        );
        let task_name = project
            .and_then(|p| p.get_task(self.task_id))
            .map_or_else(|| format!("Unknown task {}", self.task_id), |t| t.name.clone());
        format!("{project_name} - {task_name} | {}", self.description)
    }
}

/// A log's pointer to an event definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventRef {
    Id { id: EventKey },
    /// No event assigned yet.
    Empty,
}

impl EventRef {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn id(&self) -> Option<EventKey> {
        match self {
            Self::Id { id } => Some(*id),
            Self::Empty => None,
        }
    }

    /// Points this reference at `id`, promoting an empty reference.
    pub fn set_id(&mut self, id: EventKey) {
        match self {
            Self::Id { id: current } => *current = id,
            Self::Empty => *self = Self::Id { id },
        }
    }

    /// Resolves the display label, `Nothing` for an empty reference.
    pub fn label(&self, projects: &ProjectTable, events: &EventTable) -> String {
        match self {
            Self::Empty => "Nothing".to_string(),
            Self::Id { id } => events.get(*id).map_or_else(
                || format!("Unknown event {id}"),
                |definition| definition.label(projects),
            ),
        }
    }
}

impl From<Option<EventKey>> for EventRef {
    fn from(id: Option<EventKey>) -> Self {
        id.map_or(Self::Empty, |id| Self::Id { id })
    }
}

/// Registry of event definitions under auto-incrementing keys.
///
/// Keys are never reused: `last_key` only grows, so logs that reference an
/// event keep pointing at the same definition after unrelated deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventTableRecord")]
pub struct EventTable {
    table: BTreeMap<EventKey, EventDefinition>,
    last_key: EventKey,
}

/// Unchecked shape of a persisted event table.
#[derive(Deserialize)]
struct EventTableRecord {
    table: BTreeMap<EventKey, EventDefinition>,
    last_key: EventKey,
}

impl TryFrom<EventTableRecord> for EventTable {
    type Error = RegistryError;

    fn try_from(record: EventTableRecord) -> Result<Self, Self::Error> {
        let max_key = record.table.keys().next_back().copied().unwrap_or(0);
        if record.last_key < max_key {
            return Err(RegistryError::StaleEventCounter {
                last_key: record.last_key,
                max_key,
            });
        }
        Ok(Self {
            table: record.table,
            last_key: record.last_key,
        })
    }
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a definition under the next key and returns that key.
    pub fn add(&mut self, definition: EventDefinition) -> Result<EventKey, RegistryError> {
        let key = self
            .last_key
            .checked_add(1)
            .ok_or(RegistryError::EventKeysExhausted)?;
        self.last_key = key;
        self.table.insert(key, definition);
        tracing::debug!(key, "added event definition");
        Ok(key)
    }

    /// Removes a definition. Returns `None` when the key is unknown.
    pub fn remove(&mut self, key: EventKey) -> Option<EventDefinition> {
        self.table.remove(&key)
    }

    pub fn get(&self, key: EventKey) -> Option<&EventDefinition> {
        self.table.get(&key)
    }

    /// Finds the first definition with exactly this description.
    pub fn find(&self, description: &str) -> Option<EventKey> {
        self.table
            .iter()
            .find(|(_, definition)| definition.description == description)
            .map(|(key, _)| *key)
    }

    /// Iterates definitions in the order they were added.
    pub fn list(&self) -> impl Iterator<Item = (EventKey, &EventDefinition)> {
        self.table.iter().map(|(key, definition)| (*key, definition))
    }

    pub const fn last_key(&self) -> EventKey {
        self.last_key
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Project, Task};

    fn projects() -> ProjectTable {
        let mut project = Project::new(1, "Internal");
        project.add_task(Task::new(1, "Development"));
        project.add_task(Task::new(2, "QA"));
        let mut table = ProjectTable::new();
        table.add(project);
        table
    }

    #[test]
    fn keys_are_not_reused_after_delete() {
        let mut events = EventTable::new();
        let first = events.add(EventDefinition::new(1, 1, "coding")).unwrap();
        assert_eq!(first, 1);

        assert!(events.remove(1).is_some());
        let second = events.add(EventDefinition::new(1, 2, "testing")).unwrap();
        assert_eq!(second, 2);
        assert!(events.get(1).is_none());
        assert_eq!(events.last_key(), 2);
    }

    #[test]
    fn keys_strictly_increase() {
        let mut events = EventTable::new();
        let mut previous = 0;
        for round in 0..5 {
            let key = events
                .add(EventDefinition::new(1, 1, format!("round {round}")))
                .unwrap();
            assert!(key > previous);
            if round % 2 == 0 {
                events.remove(key);
            }
            previous = key;
        }
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn remove_missing_returns_none() {
        let mut events = EventTable::new();
        assert_eq!(events.remove(7), None);
    }

    #[test]
    fn find_matches_exact_description() {
        let mut events = EventTable::new();
        events.add(EventDefinition::new(1, 1, "coding")).unwrap();
        let key = events.add(EventDefinition::new(1, 2, "Coding")).unwrap();

        assert_eq!(events.find("Coding"), Some(key));
        assert_eq!(events.find("cod"), None);
    }

    #[test]
    fn list_follows_insertion_order() {
        let mut events = EventTable::new();
        events.add(EventDefinition::new(1, 1, "a")).unwrap();
        events.add(EventDefinition::new(1, 1, "b")).unwrap();
        events.add(EventDefinition::new(1, 1, "c")).unwrap();
        events.remove(2);

        let descriptions: Vec<_> = events
            .list()
            .map(|(key, d)| (key, d.description.as_str()))
            .collect();
        assert_eq!(descriptions, vec![(1, "a"), (3, "c")]);
    }

    #[test]
    fn empty_ref_promotes_on_set_id() {
        let mut event = EventRef::Empty;
        event.set_id(4);
        assert_eq!(event, EventRef::Id { id: 4 });

        event.set_id(9);
        assert_eq!(event.id(), Some(9));
    }

    #[test]
    fn labels_resolve_through_registries() {
        let projects = projects();
        let mut events = EventTable::new();
        let key = events.add(EventDefinition::new(1, 2, "release checks")).unwrap();

        assert_eq!(
            EventRef::Id { id: key }.label(&projects, &events),
            "Internal - QA | release checks"
        );
        assert_eq!(EventRef::Empty.label(&projects, &events), "Nothing");
        assert_eq!(
            EventRef::Id { id: 42 }.label(&projects, &events),
            "Unknown event 42"
        );
    }

    #[test]
    fn label_tolerates_dangling_ids() {
        let projects = projects();
        let definition = EventDefinition::new(1, 9, "triage");
        assert_eq!(
            definition.label(&projects),
            "Internal - Unknown task 9 | triage"
        );
        let definition = EventDefinition::new(3, 1, "triage");
        assert_eq!(
            definition.label(&projects),
            "Unknown project 3 - Unknown task 1 | triage"
        );
    }

    #[test]
    fn event_ref_serde_is_tagged() {
        let json = serde_json::to_string(&EventRef::Id { id: 5 }).unwrap();
        assert_eq!(json, r#"{"kind":"id","id":5}"#);
        let json = serde_json::to_string(&EventRef::Empty).unwrap();
        assert_eq!(json, r#"{"kind":"empty"}"#);
    }

    #[test]
    fn table_serde_keeps_last_key() {
        let mut events = EventTable::new();
        events.add(EventDefinition::new(1, 1, "coding")).unwrap();
        events.add(EventDefinition::new(1, 2, "testing")).unwrap();
        events.remove(2);

        let json = serde_json::to_string(&events).unwrap();
        let parsed: EventTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, events);
        assert_eq!(parsed.last_key(), 2);
    }

    #[test]
    fn table_with_counter_behind_keys_is_rejected() {
        let json = r#"{
            "table": {"1": {"project_id": 1, "task_id": 1, "description": "coding"}},
            "last_key": 0
        }"#;
        let err = serde_json::from_str::<EventTable>(json).unwrap_err();
        assert!(
            err.to_string()
                .contains("event counter 0 is behind existing key 1")
        );
    }

    #[test]
    fn table_with_counter_ahead_of_keys_loads() {
        let json = r#"{
            "table": {"1": {"project_id": 1, "task_id": 1, "description": "coding"}},
            "last_key": 4
        }"#;
        let mut events: EventTable = serde_json::from_str(json).unwrap();
        assert_eq!(events.add(EventDefinition::new(1, 2, "testing")).unwrap(), 5);
        assert_eq!(events.get(1).unwrap().description, "coding");
    }

    #[test]
    fn add_fails_when_keys_run_out() {
        let json = format!(r#"{{"table": {{}}, "last_key": {}}}"#, EventKey::MAX);
        let mut events: EventTable = serde_json::from_str(&json).unwrap();

        assert_eq!(
            events.add(EventDefinition::new(1, 1, "coding")),
            Err(RegistryError::EventKeysExhausted)
        );
        assert!(events.is_empty());
        assert_eq!(events.last_key(), EventKey::MAX);
    }
}
