use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};
use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// Front ends render from them; `TaskCompleted` is the completion alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TaskCreated {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        task_id: TaskId,
        /// The removed task's countdown was running and has been cancelled.
        was_running: bool,
        at: DateTime<Utc>,
    },
    TimerStarted {
        task_id: TaskId,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerTick {
        task_id: TaskId,
        remaining_secs: u32,
    },
    TimerStopped {
        task_id: TaskId,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: TaskId,
        name: String,
        category: String,
        duration_min: u32,
        done_at: DateTime<Utc>,
    },
    /// A sweep promoted these pending tasks to due.
    TasksDue {
        task_ids: Vec<TaskId>,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
    ThemeChanged {
        dark_mode: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        task_id: Option<TaskId>,
        task_name: Option<String>,
        remaining_secs: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::TimerTick {
            task_id: TaskId(5),
            remaining_secs: 59,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_tick");
        assert_eq!(json["task_id"], 5);
        assert_eq!(json["remaining_secs"], 59);
    }
}
