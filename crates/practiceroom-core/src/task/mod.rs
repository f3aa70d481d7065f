//! Practice task model.
//!
//! A [`Task`] is a scheduled practice item with a planned duration and a
//! countdown that the timer engine drains one second at a time.
//!
//! ## State Machine
//!
//! ```text
//! PENDING -> DUE -> DONE
//!    |               ^
//!    +---------------+
//! ```
//!
//! - PENDING → DUE (scheduled time of day has passed)
//! - PENDING | DUE → DONE (countdown reached zero)
//!
//! "Running" is not a status: a task is running while it sits in the
//! timer engine's slot. DONE is terminal.

mod store;

pub use store::TaskStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Task identifier: epoch milliseconds at creation, bumped on collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created, scheduled time not yet reached
    Pending,
    /// Scheduled time of day has passed
    Due,
    /// Countdown finished (terminal)
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Due => "due",
            TaskStatus::Done => "done",
        }
    }

    /// Whether the timer engine may start a countdown for this status.
    pub fn can_start(&self) -> bool {
        !matches!(self, TaskStatus::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock time of day, minute resolution. Stored as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Time of day of a chrono timestamp, truncated to the minute.
    pub fn of<T: chrono::Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime {
            value: s.to_string(),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u8>().map_err(|_| invalid())?;
        let minute = m.parse::<u8>().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A scheduled practice item.
///
/// Serialized field names match the persisted blob layout:
/// `{id, name, category, time, duration, remaining, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub category: String,
    /// Scheduled time of day
    pub time: TimeOfDay,
    /// Planned duration in minutes
    pub duration: u32,
    /// Countdown in seconds, always within `0..=duration*60`
    pub remaining: u32,
    pub status: TaskStatus,
}

impl Task {
    /// Build a pending task with a full countdown.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for an empty name or category, a
    /// malformed time of day, or a duration that is zero or too long to
    /// count down in seconds.
    pub fn new(
        id: TaskId,
        name: &str,
        category: &str,
        time: &str,
        duration: u32,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name)?;
        let category = required("category", category)?;
        let time: TimeOfDay = time.parse()?;
        let remaining = countdown_secs(duration)?;
        Ok(Self {
            id,
            name,
            category,
            time,
            duration,
            remaining,
            status: TaskStatus::Pending,
        })
    }

    /// Check a task read back from storage against the rules of [`Task::new`].
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for an empty name or category, an
    /// invalid duration, or a countdown longer than the planned duration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name)?;
        required("category", &self.category)?;
        let total = countdown_secs(self.duration)?;
        if self.remaining > total {
            return Err(ValidationError::InvalidRemaining {
                remaining: self.remaining,
                total,
            });
        }
        Ok(())
    }

    /// Planned duration in seconds.
    pub fn total_secs(&self) -> u64 {
        u64::from(self.duration) * 60
    }

    /// PENDING → DUE when `now` is at or past the scheduled time of day.
    ///
    /// Only the time of day is compared, so a task scheduled earlier than
    /// its creation time becomes due on the first sweep. Returns whether
    /// the status changed.
    pub fn mark_due_if_reached(&mut self, now: TimeOfDay) -> bool {
        if self.status == TaskStatus::Pending && now >= self.time {
            self.status = TaskStatus::Due;
            return true;
        }
        false
    }

    /// Remove one second from the countdown. Returns the new remaining value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn mark_done(&mut self) {
        self.remaining = 0;
        self.status = TaskStatus::Done;
    }
}

/// Seconds in a duration of `minutes`; zero and overflowing values are rejected.
fn countdown_secs(minutes: u32) -> Result<u32, ValidationError> {
    minutes
        .checked_mul(60)
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ValidationError::InvalidDuration {
            value: minutes.to_string(),
        })
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
