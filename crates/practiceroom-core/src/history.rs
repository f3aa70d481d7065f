//! Append-only log of completed practice sessions.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Snapshot of a task at the moment its countdown finished.
///
/// Persisted as the task's fields plus `doneAt` (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub task: Task,
    #[serde(rename = "doneAt")]
    pub done_at_ms: i64,
}

impl HistoryEntry {
    pub fn new(task: &Task, done_at: DateTime<Local>) -> Self {
        Self {
            task: task.clone(),
            done_at_ms: done_at.timestamp_millis(),
        }
    }

    /// Completion instant in local time, `None` if the stored value is out of range.
    pub fn done_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.done_at_ms).single()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries oldest first.
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries newest first, for display.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskId, TaskStatus};

    fn done_task(id: i64, name: &str) -> Task {
        let mut task = Task::new(TaskId(id), name, "technique", "09:30", 1).unwrap();
        task.mark_done();
        task
    }

    #[test]
    fn entry_serializes_task_fields_and_done_at() {
        let at = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let entry = HistoryEntry::new(&done_task(7, "Chords"), at);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Chords");
        assert_eq!(json["status"], "done");
        assert_eq!(json["remaining"], 0);
        assert_eq!(json["doneAt"], 1_700_000_000_000i64);

        let back: HistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.done_at(), Some(at));
    }

    #[test]
    fn append_keeps_order_and_newest_first_reverses() {
        let at = Local.timestamp_millis_opt(0).unwrap();
        let mut log = HistoryLog::new();
        log.append(HistoryEntry::new(&done_task(1, "A"), at));
        log.append(HistoryEntry::new(&done_task(2, "B"), at));
        let names: Vec<_> = log.all().iter().map(|e| e.task.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        let reversed: Vec<_> = log.newest_first().map(|e| e.task.name.as_str()).collect();
        assert_eq!(reversed, ["B", "A"]);
    }

    #[test]
    fn clear_empties_log() {
        let at = Local.timestamp_millis_opt(0).unwrap();
        let mut log = HistoryLog::new();
        for i in 0..5 {
            log.append(HistoryEntry::new(&done_task(i, "X"), at));
        }
        assert_eq!(log.clear(), 5);
        assert!(log.is_empty());
        assert_eq!(log.clear(), 0);
    }

    #[test]
    fn entry_keeps_status_from_snapshot() {
        let at = Local.timestamp_millis_opt(0).unwrap();
        let entry = HistoryEntry::new(&done_task(3, "Y"), at);
        assert_eq!(entry.task.status, TaskStatus::Done);
    }
}
