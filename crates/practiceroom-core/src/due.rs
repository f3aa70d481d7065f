//! Periodic due sweep.
//!
//! Every sweep interval the pending tasks whose scheduled time of day has
//! been reached are promoted to due. The comparison ignores the date.

use chrono::{DateTime, Local};
use std::time::Duration;

use crate::task::{TaskId, TaskStore, TimeOfDay};
use crate::timer::{ScheduleToken, Scheduler};

#[derive(Debug, Clone)]
pub struct DueScheduler {
    interval: Duration,
    token: Option<ScheduleToken>,
}

impl Default for DueScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl DueScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            token: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn token(&self) -> Option<ScheduleToken> {
        self.token
    }

    /// Register the periodic sweep, replacing any earlier registration.
    pub fn install(&mut self, scheduler: &mut dyn Scheduler, now: DateTime<Local>) -> ScheduleToken {
        self.uninstall(scheduler);
        let token = scheduler.schedule_repeating(self.interval, now);
        self.token = Some(token);
        token
    }

    pub fn uninstall(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
    }

    /// Promote every pending task whose time of day is at or before `now`.
    ///
    /// Returns the ids that changed, in store order.
    pub fn sweep(&self, tasks: &mut TaskStore, now: TimeOfDay) -> Vec<TaskId> {
        let promoted: Vec<TaskId> = tasks
            .iter_mut()
            .filter_map(|t| t.mark_due_if_reached(now).then_some(t.id))
            .collect();
        tracing::debug!(now = %now, promoted = promoted.len(), "due sweep");
        promoted
    }
}
