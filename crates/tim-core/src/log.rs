//! The daily log: time markers and the events between them.
//!
//! A log holds `n + 1` time markers for `n` events; event `i` covers the
//! interval from `times[i]` to `times[i + 1]`. While the last marker is
//! floating the log is open and its final interval runs up to now.

use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::event::{EventKey, EventRef};
use crate::time::{self, TimeFields, TimeMarker, Timestamp};

/// Format of the date key a log is stored and looked up under.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One day's time log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimRecord")]
pub struct Tim {
    times: Vec<TimeMarker>,
    events: Vec<EventRef>,
    start_date: Timestamp,
}

/// Unchecked shape of a persisted log.
#[derive(Deserialize)]
struct TimRecord {
    times: Vec<TimeMarker>,
    events: Vec<EventRef>,
    start_date: Timestamp,
}

impl TryFrom<TimRecord> for Tim {
    type Error = LogError;

    fn try_from(record: TimRecord) -> Result<Self, Self::Error> {
        if record.times.len() != record.events.len() + 1 {
            return Err(LogError::Misaligned {
                times: record.times.len(),
                events: record.events.len(),
            });
        }
        Ok(Self {
            times: record.times,
            events: record.events,
            start_date: record.start_date,
        })
    }
}

/// A resolved interval of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub position: usize,
    pub start: Timestamp,
    pub end: Timestamp,
    pub event: EventRef,
}

impl Interval {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl Tim {
    /// Starts a log at the current time.
    pub fn start(event: Option<EventKey>) -> Self {
        Self::start_at(time::now(), event)
    }

    /// Starts a log at `now`: one fixed marker, one floating marker, and
    /// a single event slot.
    pub fn start_at(now: Timestamp, event: Option<EventKey>) -> Self {
        Self {
            times: vec![TimeMarker::at(now), TimeMarker::Float],
            events: vec![EventRef::from(event)],
            start_date: now,
        }
    }

    pub const fn start_date(&self) -> Timestamp {
        self.start_date
    }

    /// The `YYYY-MM-DD` key this log is stored under.
    pub fn date_key(&self) -> String {
        self.start_date.format(DATE_KEY_FORMAT).to_string()
    }

    pub fn times(&self) -> &[TimeMarker] {
        &self.times
    }

    pub fn events(&self) -> &[EventRef] {
        &self.events
    }

    /// Returns true while the final marker is floating.
    pub fn is_open(&self) -> bool {
        self.times.last().is_some_and(TimeMarker::is_floating)
    }

    /// Closes the current interval and opens a new one for `event_id`.
    pub fn add(&mut self, event_id: EventKey) -> Result<(), LogError> {
        self.add_at(time::now(), event_id)
    }

    pub fn add_at(&mut self, now: Timestamp, event_id: EventKey) -> Result<(), LogError> {
        self.finalize_last(now)?;
        self.times.push(TimeMarker::Float);
        self.events.push(EventRef::Id { id: event_id });
        tracing::debug!(event_id, intervals = self.events.len(), "added interval");
        Ok(())
    }

    /// Fixes the final marker at the current time.
    pub fn stop(&mut self) -> Result<(), LogError> {
        self.stop_at(time::now())
    }

    pub fn stop_at(&mut self, now: Timestamp) -> Result<(), LogError> {
        self.finalize_last(now)?;
        tracing::debug!(date = %self.date_key(), "stopped log");
        Ok(())
    }

    fn finalize_last(&mut self, now: Timestamp) -> Result<(), LogError> {
        match self.times.last_mut() {
            Some(last) if last.is_floating() => {
                *last = last.set_at(now);
                Ok(())
            }
            _ => Err(LogError::Closed),
        }
    }

    /// Edits the fixed marker at `position`; floating markers are left as is.
    pub fn update_time(&mut self, position: usize, fields: &TimeFields) -> Result<(), LogError> {
        let len = self.times.len();
        let marker = self
            .times
            .get_mut(position)
            .ok_or(LogError::PositionOutOfRange {
                kind: "time",
                position,
                len,
            })?;
        marker.update(fields)
    }

    /// Points the event at `position` to `event_id`.
    pub fn update_event(&mut self, position: usize, event_id: EventKey) -> Result<(), LogError> {
        let len = self.events.len();
        let event = self
            .events
            .get_mut(position)
            .ok_or(LogError::PositionOutOfRange {
                kind: "event",
                position,
                len,
            })?;
        event.set_id(event_id);
        Ok(())
    }

    /// Resolves every interval, with `now` standing in for floating markers.
    pub fn intervals_at(&self, now: Timestamp) -> impl Iterator<Item = Interval> + '_ {
        self.events
            .iter()
            .zip(self.times.windows(2))
            .enumerate()
            .map(move |(position, (event, bounds))| Interval {
                position,
                start: bounds[0].time_at(now),
                end: bounds[1].time_at(now),
                event: *event,
            })
    }
}
