//! Log command for recording and editing daily time logs.
//!
//! Everything except `list`, `show --log` and `delete` works on the latest
//! log. Mutating actions save the log and print its timeline afterwards.

use std::io::Write;

use anyhow::{Context, Result};
use tim_core::{EventKey, EventTable, LogError, ProjectTable, Tim, TimeFields};
use tim_store::{JsonStore, TimManager};

use crate::{Config, EditAction, LogAction};

const NO_LOGS: &str = "No logs yet. Run 'tim log start' to begin one.";

/// Project and event tables needed to label a log.
struct Registries {
    projects: ProjectTable,
    events: EventTable,
}

impl Registries {
    fn load(config: &Config) -> Result<Self> {
        let projects = JsonStore::new(config.project_table_path())
            .load_or_default()
            .context("failed to load project table")?;
        let events = JsonStore::new(config.event_table_path())
            .load_or_default()
            .context("failed to load event table")?;
        Ok(Self { projects, events })
    }

    fn show(&self, log: &Tim) -> String {
        log.show(&self.projects, &self.events)
    }

    /// Writes a diagnostic and returns false when `id` is not defined.
    fn check_event<W: Write>(&self, writer: &mut W, id: EventKey) -> Result<bool> {
        if self.events.get(id).is_some() {
            return Ok(true);
        }
        writeln!(writer, "No event with id {id}. See 'tim event list'.")?;
        Ok(false)
    }
}

/// Runs a log subcommand against the log directory.
pub fn run<W: Write>(writer: &mut W, config: &Config, action: &LogAction) -> Result<()> {
    let mut logs = TimManager::load(config.log_dir()).context("failed to load logs")?;

    match action {
        LogAction::List => list(writer, &logs),
        LogAction::Start { event, force } => start(writer, config, &mut logs, *event, *force),
        LogAction::Show { log } => show(writer, config, &logs, log.as_deref()),
        LogAction::Delete { log } => {
            if logs.delete(log)? {
                writeln!(writer, "Deleted log {log}.")?;
            } else {
                writeln!(writer, "No log for {log}.")?;
            }
            Ok(())
        }
        LogAction::Stop => {
            let registries = Registries::load(config)?;
            edit_latest(writer, &mut logs, &registries, Tim::stop)
        }
        LogAction::Export => {
            let registries = Registries::load(config)?;
            let Some(log) = logs.latest() else {
                writeln!(writer, "{NO_LOGS}")?;
                return Ok(());
            };
            let csv = log
                .export(&registries.events)
                .with_context(|| format!("failed to export log {}", log.date_key()))?;
            writeln!(writer, "{csv}")?;
            Ok(())
        }
        LogAction::Add { event } => {
            let registries = Registries::load(config)?;
            if !registries.check_event(writer, *event)? {
                return Ok(());
            }
            edit_latest(writer, &mut logs, &registries, |log| log.add(*event))
        }
        LogAction::Edit(edit) => {
            let registries = Registries::load(config)?;
            match edit {
                EditAction::Time {
                    position,
                    year,
                    month,
                    day,
                    hour,
                    minute,
                } => {
                    let fields = TimeFields {
                        year: *year,
                        month: *month,
                        day: *day,
                        hour: *hour,
                        minute: *minute,
                    };
                    if fields.is_empty() {
                        writeln!(
                            writer,
                            "Nothing to update; pass one of --year --month --day --hour --minute."
                        )?;
                        return Ok(());
                    }
                    tracing::debug!(position, ?fields, "editing time");
                    edit_latest(writer, &mut logs, &registries, |log| {
                        log.update_time(*position, &fields)
                    })
                }
                EditAction::Event { position, id } => {
                    if !registries.check_event(writer, *id)? {
                        return Ok(());
                    }
                    edit_latest(writer, &mut logs, &registries, |log| {
                        log.update_event(*position, *id)
                    })
                }
            }
        }
    }
}

fn list<W: Write>(writer: &mut W, logs: &TimManager) -> Result<()> {
    let mut any = false;
    for (key, _) in logs.list() {
        writeln!(writer, "{key}")?;
        any = true;
    }
    if !any {
        writeln!(writer, "{NO_LOGS}")?;
    }
    Ok(())
}

fn start<W: Write>(
    writer: &mut W,
    config: &Config,
    logs: &mut TimManager,
    event: Option<EventKey>,
    force: bool,
) -> Result<()> {
    let registries = Registries::load(config)?;
    if let Some(id) = event {
        if !registries.check_event(writer, id)? {
            return Ok(());
        }
    }

    let key = if force {
        logs.start_replacing(event).date_key()
    } else {
        logs.start(event)
            .context("use --force to replace today's log")?
            .date_key()
    };
    logs.save(&key).context("failed to save log")?;

    if let Some(log) = logs.get(&key) {
        writeln!(writer, "{}", registries.show(log))?;
    }
    Ok(())
}

fn show<W: Write>(
    writer: &mut W,
    config: &Config,
    logs: &TimManager,
    key: Option<&str>,
) -> Result<()> {
    let log = match key {
        Some(key) => {
            let Some(log) = logs.get(key) else {
                writeln!(writer, "No log for {key}.")?;
                return Ok(());
            };
            log
        }
        None => {
            let Some(log) = logs.latest() else {
                writeln!(writer, "{NO_LOGS}")?;
                return Ok(());
            };
            log
        }
    };

    let registries = Registries::load(config)?;
    writeln!(writer, "{}", registries.show(log))?;
    Ok(())
}

/// Applies `edit` to the latest log, saves it and prints the result.
fn edit_latest<W, F>(
    writer: &mut W,
    logs: &mut TimManager,
    registries: &Registries,
    edit: F,
) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut Tim) -> Result<(), LogError>,
{
    let Some((key, log)) = logs.latest_mut() else {
        writeln!(writer, "{NO_LOGS}")?;
        return Ok(());
    };
    let key = key.to_owned();
    edit(log).with_context(|| format!("failed to update log {key}"))?;
    logs.save(&key).context("failed to save log")?;

    if let Some(log) = logs.get(&key) {
        writeln!(writer, "{}", registries.show(log))?;
    }
    Ok(())
}
