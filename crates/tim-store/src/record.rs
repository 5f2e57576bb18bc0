//! Versioned JSON documents on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct OwnedEnvelope<T> {
    data: T,
}

/// Handle to a single whole-object store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document. A missing or unreadable file is an error.
    ///
    /// The CLI opens its stores with [`JsonStore::load_or_default`] instead,
    /// so a fresh data directory works without an init step. Use this where
    /// the file must already exist.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        read(&self.path)
    }

    /// Loads the document, or `T::default()` if the file does not exist yet.
    ///
    /// A file that exists but cannot be parsed is still an error. A missing
    /// file is indistinguishable from a first run, so it is only logged at
    /// debug level.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        match read(&self.path) {
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "store file missing, starting empty");
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Writes the document, creating the parent directory if needed.
    pub fn save<T: Serialize>(&self, data: &T) -> Result<(), StoreError> {
        write(&self.path, data)
    }
}

/// Reads a versioned document from `path`.
pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let version = serde_json::from_str::<VersionProbe>(&content)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .version;
    if version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: version,
        });
    }

    let envelope: OwnedEnvelope<T> =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(envelope.data)
}

/// Writes a versioned document to `path`, creating its directory.
pub(crate) fn write<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let envelope = Envelope {
        version: FORMAT_VERSION,
        data,
    };
    let json = serde_json::to_string_pretty(&envelope).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = ?path, "saved store file");
    Ok(())
}

/// Reads only the version, so a newer document is reported as such rather
/// than as a parse failure of its payload.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    use tim_core::{EventDefinition, EventTable, Project, ProjectTable, Task};

    #[test]
    fn project_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/projects.json"));

        let mut projects = ProjectTable::new();
        let mut project = Project::new(2, "Ops");
        project.add_task(Task::new(1, "On-call"));
        projects.add(project);
        projects.add(Project::new(1, "Docs"));

        store.save(&projects).unwrap();
        let loaded: ProjectTable = store.load().unwrap();
        assert_eq!(loaded, projects);
    }

    #[test]
    fn event_table_roundtrip_keeps_counter() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("events.json"));

        let mut events = EventTable::new();
        events.add(EventDefinition::new(1, 1, "coding")).unwrap();
        events.add(EventDefinition::new(1, 2, "review")).unwrap();
        events.remove(2);
        store.save(&events).unwrap();

        let mut loaded: EventTable = store.load().unwrap();
        assert_eq!(loaded, events);
        assert_eq!(loaded.add(EventDefinition::new(1, 1, "next")).unwrap(), 3);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("missing.json"));

        let result: Result<ProjectTable, _> = store.load();
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("missing.json"));

        let table: EventTable = store.load_or_default().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn load_or_default_still_fails_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "not json").unwrap();

        let result: Result<EventTable, _> = JsonStore::new(&path).load_or_default();
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, r#"{"version": 2, "data": {"whatever": true}}"#).unwrap();

        let result: Result<EventTable, _> = JsonStore::new(&path).load();
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn saved_file_is_inspectable_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("events.json"));
        let mut events = EventTable::new();
        events.add(EventDefinition::new(4, 2, "coding")).unwrap();
        store.save(&events).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["data"]["last_key"], 1);
        assert_eq!(value["data"]["table"]["1"]["description"], "coding");
    }
}
