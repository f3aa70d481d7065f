//! Practice statistics derived from history.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Minutes practiced on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    /// Short weekday name ("Mon", "Tue", ...)
    pub label: String,
    pub minutes: u64,
}

/// Seven-day practice totals, oldest day first, ending today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub days: Vec<DayTotal>,
}

impl WeeklyStats {
    pub const DAYS: u32 = 7;

    /// Sum the planned duration of every entry completed on each of the
    /// last seven local days. Entries outside the window are ignored.
    pub fn from_history(history: &[HistoryEntry], today: NaiveDate) -> Self {
        let days = (0..Self::DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(chrono::Days::new(back as u64)))
            .map(|date| {
                let minutes = history
                    .iter()
                    .filter(|e| e.done_at().map(|d| d.date_naive()) == Some(date))
                    .map(|e| u64::from(e.task.duration))
                    .sum();
                DayTotal {
                    date,
                    label: date.weekday().to_string(),
                    minutes,
                }
            })
            .collect();
        Self { days }
    }

    pub fn total_minutes(&self) -> u64 {
        self.days.iter().map(|d| d.minutes).sum()
    }

    pub fn max_minutes(&self) -> u64 {
        self.days.iter().map(|d| d.minutes).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use chrono::{Local, TimeZone};

    fn entry(minutes: u32, y: i32, mo: u32, d: u32, h: u32) -> HistoryEntry {
        let mut task = Task::new(TaskId(1), "Scales", "technique", "08:00", minutes).unwrap();
        task.mark_done();
        HistoryEntry::new(&task, Local.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap())
    }

    #[test]
    fn buckets_last_seven_days() {
        // 2025-01-12 is a Sunday.
        let today = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let history = vec![
            entry(10, 2025, 1, 12, 9),
            entry(5, 2025, 1, 12, 20),
            entry(30, 2025, 1, 6, 10),
            // Outside the window.
            entry(45, 2025, 1, 5, 10),
        ];
        let stats = WeeklyStats::from_history(&history, today);
        assert_eq!(stats.days.len(), 7);
        assert_eq!(stats.days[0].date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(stats.days[0].label, "Mon");
        assert_eq!(stats.days[0].minutes, 30);
        assert_eq!(stats.days[6].label, "Sun");
        assert_eq!(stats.days[6].minutes, 15);
        assert_eq!(stats.total_minutes(), 45);
        assert_eq!(stats.max_minutes(), 30);
    }

    #[test]
    fn empty_history_gives_zero_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let stats = WeeklyStats::from_history(&[], today);
        assert_eq!(stats.days.len(), 7);
        assert_eq!(stats.total_minutes(), 0);
        assert_eq!(stats.max_minutes(), 0);
    }

    #[test]
    fn long_sessions_sum_past_u32() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let longest = u32::MAX / 60;
        let history = vec![
            entry(longest, 2025, 1, 12, 8),
            entry(longest, 2025, 1, 12, 9),
            entry(longest, 2025, 1, 11, 9),
        ];
        let stats = WeeklyStats::from_history(&history, today);
        assert_eq!(stats.days[6].minutes, 2 * u64::from(longest));
        assert_eq!(stats.total_minutes(), 3 * u64::from(longest));
    }
}
