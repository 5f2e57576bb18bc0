//! Text renderings of a daily log: the timeline view and the CSV export.

use crate::error::LogError;
use crate::event::{EventRef, EventTable};
use crate::log::Tim;
use crate::project::ProjectTable;
use crate::time::{self, Timestamp};

/// Header row of the CSV export.
pub const EXPORT_HEADER: &str = "Date,Project/Database ID,Task/Database ID,Description,Quantity";

/// Minutes represented by one row of the timeline.
const ROW_MINUTES: i64 = 15;

impl Tim {
    /// Renders the log as a timeline, resolving floating markers to now.
    pub fn show(&self, projects: &ProjectTable, events: &EventTable) -> String {
        self.show_at(time::now(), projects, events)
    }

    /// Renders the log as a timeline.
    ///
    /// Each interval gets one `|` row per started quarter hour (at least
    /// one) with its label on the middle row, framed by numbered markers.
    pub fn show_at(&self, now: Timestamp, projects: &ProjectTable, events: &EventTable) -> String {
        let mut lines = Vec::new();
        for interval in self.intervals_at(now) {
            let position = interval.position;
            lines.push(format!("{position}) {}", self.times()[position].show_at(now)));

            let rows = row_count(interval.duration().num_minutes());
            let label = interval.event.label(projects, events);
            lines.extend((0..rows).map(|row| {
                if row == rows / 2 {
                    format!("  | {position}) {label}")
                } else {
                    "  |".to_string()
                }
            }));
        }

        // The closing marker is set apart from the interval numbering.
        let last = self.times().len() - 1;
        lines.push(format!("{last} ) {}", self.times()[last].show_at(now)));
        lines.join("\n")
    }

    /// Exports the log as CSV, closing any open interval at now.
    pub fn export(&self, events: &EventTable) -> Result<String, LogError> {
        self.export_at(time::now(), events)
    }

    /// Exports one CSV row per interval that has an event assigned.
    ///
    /// Quantity is the interval length in hours.
    pub fn export_at(&self, now: Timestamp, events: &EventTable) -> Result<String, LogError> {
        let mut lines = vec![EXPORT_HEADER.to_string()];
        for interval in self.intervals_at(now) {
            let EventRef::Id { id } = interval.event else {
                continue;
            };
            let definition = events.get(id).ok_or(LogError::UnknownEvent(id))?;
            let hours = hours(interval.duration().num_seconds());
            // `{:?}` keeps the decimal point on whole hours (`1.0`).
            lines.push(format!(
                "{},{},{},{},{hours:?}",
                interval.start.format("%m/%d/%Y"),
                definition.project_id,
                definition.task_id,
                quote(&definition.description),
            ));
        }
        Ok(lines.join("\n"))
    }
}

fn row_count(minutes: i64) -> i64 {
    if minutes <= 0 {
        1
    } else {
        (minutes - 1) / ROW_MINUTES + 1
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "interval lengths are far below 2^52 seconds"
)]
fn hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
