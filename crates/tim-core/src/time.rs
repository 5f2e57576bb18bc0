//! Time markers bounding the intervals of a daily log.
//!
//! A marker is either fixed to a wall-clock minute or floating. A floating
//! marker has no stored value and reads as "now" until it is finalized with
//! [`TimeMarker::set`], which is how the open interval at the end of a log
//! stays accurate without being rewritten.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// A wall-clock instant with the offset it was recorded in.
pub type Timestamp = DateTime<FixedOffset>;

/// Display format for marker timestamps.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Returns the current local time, truncated to the minute.
pub fn now() -> Timestamp {
    truncate_to_minute(Local::now().fixed_offset())
}

/// Zeroes the seconds and sub-second part of a timestamp.
pub fn truncate_to_minute(time: Timestamp) -> Timestamp {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// A boundary between two intervals of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeMarker {
    /// A fixed point in time.
    Set { time: Timestamp },
    /// Tracks the current time until finalized.
    Float,
}

impl TimeMarker {
    /// Creates a fixed marker at the given instant.
    pub fn at(time: Timestamp) -> Self {
        Self::Set {
            time: truncate_to_minute(time),
        }
    }

    /// Returns true while the marker still tracks the current time.
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Float)
    }

    /// Resolves the marker against the system clock.
    pub fn time(&self) -> Timestamp {
        self.time_at(now())
    }

    /// Resolves the marker, with `now` standing in for the current time.
    pub fn time_at(&self, now: Timestamp) -> Timestamp {
        match self {
            Self::Set { time } => truncate_to_minute(*time),
            Self::Float => truncate_to_minute(now),
        }
    }

    /// Overwrites the provided fields of a fixed marker.
    ///
    /// Floating markers ignore edits; they must be finalized first. All
    /// fields are applied together, so an edit that would land on an
    /// impossible date leaves the marker untouched.
    pub fn update(&mut self, fields: &TimeFields) -> Result<(), LogError> {
        let Self::Set { time } = self else {
            return Ok(());
        };
        *time = fields.apply(*time)?;
        Ok(())
    }

    /// Finalizes the marker at the current time.
    #[must_use]
    pub fn set(self) -> Self {
        self.set_at(now())
    }

    /// Finalizes the marker at `now`. Fixed markers are returned unchanged.
    #[must_use]
    pub fn set_at(self, now: Timestamp) -> Self {
        match self {
            Self::Set { .. } => self,
            Self::Float => Self::at(now),
        }
    }

    /// Formats the resolved time for display.
    pub fn show_at(&self, now: Timestamp) -> String {
        self.time_at(now).format(DISPLAY_FORMAT).to_string()
    }
}

/// Partial date/time components for editing a fixed marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFields {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
}

impl TimeFields {
    /// Returns true when no field is provided.
    pub const fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.hour.is_none()
            && self.minute.is_none()
    }

    /// Returns `time` with every provided field replaced, in local time.
    pub fn apply(&self, time: Timestamp) -> Result<Timestamp, LogError> {
        self.apply_in(time, &Local)
    }

    /// Returns `time` with every provided field replaced.
    ///
    /// The edited wall-clock time is resolved in `zone`, so the offset is
    /// the one in effect on the new date. An ambiguous time takes the
    /// earlier instant; a time skipped by a clock change is invalid.
    pub fn apply_in<Tz: TimeZone>(
        &self,
        time: Timestamp,
        zone: &Tz,
    ) -> Result<Timestamp, LogError> {
        let time = truncate_to_minute(time);
        let year = self.year.unwrap_or_else(|| time.year());
        let month = self.month.unwrap_or_else(|| time.month());
        let day = self.day.unwrap_or_else(|| time.day());
        let hour = self.hour.unwrap_or_else(|| time.hour());
        let minute = self.minute.unwrap_or_else(|| time.minute());

        let date =
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| LogError::InvalidField {
                field: "date",
                value: format!("{year:04}-{month:02}-{day:02}"),
            })?;
        let clock =
            NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| LogError::InvalidField {
                field: "time",
                value: format!("{hour:02}:{minute:02}"),
            })?;

        zone.from_local_datetime(&date.and_time(clock))
            .earliest()
            .map(|resolved| resolved.fixed_offset())
            .ok_or_else(|| LogError::InvalidField {
                field: "time",
                value: format!("{date} {clock}"),
            })
    }
}
