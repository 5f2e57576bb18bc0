//! Daily logs stored one file per day.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tim_core::time::{self, Timestamp};
use tim_core::{DATE_KEY_FORMAT, EventKey, Tim};

use crate::StoreError;
use crate::record::{read, write};

/// File extension of a stored log.
pub const LOG_EXTENSION: &str = "json";

/// Returns the date key for a `YYYY-MM-DD.json` file name.
///
/// Anything else, including dates that are not zero-padded, is rejected.
pub fn parse_log_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(LOG_EXTENSION)?.strip_suffix('.')?;
    let date = NaiveDate::parse_from_str(stem, DATE_KEY_FORMAT).ok()?;
    let key = date.format(DATE_KEY_FORMAT).to_string();
    (key == stem).then_some(key)
}

/// All daily logs found in one directory, keyed by date.
///
/// Keys are zero-padded ISO dates, so their ordering is chronological.
#[derive(Debug)]
pub struct TimManager {
    dir: PathBuf,
    logs: BTreeMap<String, Tim>,
}

impl TimManager {
    /// Loads every `YYYY-MM-DD.json` log in `dir`, creating `dir` if needed.
    ///
    /// Other entries are skipped with a warning. A recognized file that
    /// cannot be read or parsed fails the whole load.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let entries = std::fs::read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut logs = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let key = entry
                .file_name()
                .to_str()
                .and_then(parse_log_file_name)
                .filter(|_| path.is_file());
            let Some(key) = key else {
                tracing::warn!(
                    path = ?path,
                    "skipping unrecognized entry, expected YYYY-MM-DD.{LOG_EXTENSION}"
                );
                continue;
            };
            let log: Tim = read(&path)?;
            logs.insert(key, log);
        }

        tracing::debug!(dir = ?dir, count = logs.len(), "loaded logs");
        Ok(Self { dir, logs })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file a log with this date key is stored in.
    pub fn log_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{LOG_EXTENSION}"))
    }

    /// Iterates logs in ascending date order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &Tim)> {
        self.logs.iter().map(|(key, log)| (key.as_str(), log))
    }

    pub fn get(&self, key: &str) -> Option<&Tim> {
        self.logs.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tim> {
        self.logs.get_mut(key)
    }

    /// Key of the most recent log.
    pub fn latest_key(&self) -> Option<&str> {
        self.logs.keys().next_back().map(String::as_str)
    }

    /// The most recent log, if any.
    pub fn latest(&self) -> Option<&Tim> {
        self.logs.values().next_back()
    }

    /// The most recent log with its key, for editing.
    pub fn latest_mut(&mut self) -> Option<(&str, &mut Tim)> {
        self.logs
            .iter_mut()
            .next_back()
            .map(|(key, log)| (key.as_str(), log))
    }

    /// Starts today's log. Fails if one is already loaded for today.
    pub fn start(&mut self, event: Option<EventKey>) -> Result<&Tim, StoreError> {
        self.start_at(time::now(), event)
    }

    pub fn start_at(
        &mut self,
        now: Timestamp,
        event: Option<EventKey>,
    ) -> Result<&Tim, StoreError> {
        let log = Tim::start_at(now, event);
        let key = log.date_key();
        if self.logs.contains_key(&key) {
            return Err(StoreError::LogExists(key));
        }
        Ok(self.logs.entry(key).or_insert(log))
    }

    /// Starts today's log, discarding any log already loaded for today.
    pub fn start_replacing(&mut self, event: Option<EventKey>) -> &Tim {
        self.start_replacing_at(time::now(), event)
    }

    pub fn start_replacing_at(&mut self, now: Timestamp, event: Option<EventKey>) -> &Tim {
        let log = Tim::start_at(now, event);
        let key = log.date_key();
        if self.logs.contains_key(&key) {
            tracing::warn!(date = %key, "replacing existing log");
        }
        self.logs.insert(key.clone(), log);
        &self.logs[&key]
    }

    /// Writes the log stored under `key` to its file.
    pub fn save(&self, key: &str) -> Result<(), StoreError> {
        let log = self
            .logs
            .get(key)
            .ok_or_else(|| StoreError::LogNotFound(key.to_string()))?;
        write(&self.log_path(&log.date_key()), log)
    }

    /// Writes every loaded log.
    pub fn save_all(&self) -> Result<(), StoreError> {
        self.logs.keys().try_for_each(|key| self.save(key))
    }

    /// Deletes the log stored under `key`. Returns false if there is none.
    pub fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        let Some(log) = self.logs.remove(key) else {
            return Ok(false);
        };
        let path = self.log_path(&log.date_key());
        std::fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })?;
        tracing::debug!(date = %key, "deleted log");
        Ok(true)
    }
}
