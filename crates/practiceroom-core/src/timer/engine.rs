//! Countdown timer engine.
//!
//! A single-slot state machine. At most one task counts down at a time:
//! the engine owns the slot and the schedule token of its one-second tick,
//! and it never touches the clock itself. The owner routes each firing of
//! that token to [`TimerEngine::tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --(remaining == 0)--> Idle
//!                    |  ^
//!                  stop start
//!                    v  |
//!                    Idle
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::port::{ScheduleToken, Scheduler};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::history::HistoryEntry;
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveCountdown {
    task_id: TaskId,
    token: ScheduleToken,
}

/// Result of routing one tick to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Countdown moved one second.
    Ticked(Event),
    /// Countdown reached zero; the task is done and this entry belongs in history.
    Expired(HistoryEntry),
    /// The token does not belong to the running countdown.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    tick_period: Duration,
    active: Option<ActiveCountdown>,
    /// Task that was last started and not yet finished; kept across `stop`
    /// so `resume` can pick it up again.
    current: Option<TaskId>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TimerEngine {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            tick_period,
            active: None,
            current: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.active.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    /// Task whose countdown is running right now.
    pub fn active_task(&self) -> Option<TaskId> {
        self.active.map(|a| a.task_id)
    }

    /// Running task, or the last stopped one.
    pub fn current_task(&self) -> Option<TaskId> {
        self.current
    }

    pub fn token(&self) -> Option<ScheduleToken> {
        self.active.map(|a| a.token)
    }

    /// Re-select `id` as the task to resume after a restart.
    ///
    /// Has no effect while a countdown is running.
    pub fn restore(&mut self, id: TaskId) {
        if self.active.is_none() {
            self.current = Some(id);
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, task: Option<&Task>, now: DateTime<Local>) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            task_id: task.map(|t| t.id),
            task_name: task.map(|t| t.name.clone()),
            remaining_secs: task.map(|t| t.remaining).unwrap_or(0),
            total_secs: task.map(|t| t.total_secs()).unwrap_or(0),
            at: now.with_timezone(&Utc),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) counting `task` down.
    ///
    /// Any countdown already running is cancelled first.
    ///
    /// # Errors
    /// [`CoreError::InvalidState`] if the task is already done.
    pub fn start(
        &mut self,
        task: &Task,
        scheduler: &mut dyn Scheduler,
        now: DateTime<Local>,
    ) -> Result<Event> {
        if !task.status.can_start() {
            return Err(CoreError::InvalidState {
                id: task.id,
                status: task.status,
            });
        }
        if let Some(prev) = self.active.take() {
            scheduler.cancel(prev.token);
            tracing::debug!(task_id = %prev.task_id, "cancelled previous countdown");
        }
        let token = scheduler.schedule_repeating(self.tick_period, now);
        self.active = Some(ActiveCountdown {
            task_id: task.id,
            token,
        });
        self.current = Some(task.id);
        tracing::info!(task_id = %task.id, remaining = task.remaining, "countdown started");
        Ok(Event::TimerStarted {
            task_id: task.id,
            remaining_secs: task.remaining,
            at: now.with_timezone(&Utc),
        })
    }

    /// Cancel the running countdown, keeping the task's remaining time.
    pub fn stop(
        &mut self,
        task: Option<&Task>,
        scheduler: &mut dyn Scheduler,
        now: DateTime<Local>,
    ) -> Option<Event> {
        let active = self.active.take()?;
        scheduler.cancel(active.token);
        let remaining_secs = task.map(|t| t.remaining).unwrap_or(0);
        tracing::info!(task_id = %active.task_id, remaining = remaining_secs, "countdown stopped");
        Some(Event::TimerStopped {
            task_id: active.task_id,
            remaining_secs,
            at: now.with_timezone(&Utc),
        })
    }

    /// Drop the countdown for a task that is going away.
    ///
    /// Returns whether a running countdown was cancelled.
    pub fn forget(&mut self, id: TaskId, scheduler: &mut dyn Scheduler) -> bool {
        if self.current == Some(id) {
            self.current = None;
        }
        match self.active {
            Some(active) if active.task_id == id => {
                scheduler.cancel(active.token);
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Route a schedule firing. `task` must be the active task's record.
    ///
    /// Each tick removes one second. When the countdown hits zero the tick
    /// schedule is cancelled, the task is marked done and a history entry
    /// stamped with `now` is returned.
    pub fn tick(
        &mut self,
        token: ScheduleToken,
        task: &mut Task,
        scheduler: &mut dyn Scheduler,
        now: DateTime<Local>,
    ) -> TickOutcome {
        let active = match self.active {
            Some(active) if active.token == token && active.task_id == task.id => active,
            _ => return TickOutcome::Ignored,
        };

        let remaining = task.tick();
        tracing::debug!(task_id = %task.id, remaining, "tick");
        if remaining > 0 {
            return TickOutcome::Ticked(Event::TimerTick {
                task_id: task.id,
                remaining_secs: remaining,
            });
        }

        scheduler.cancel(active.token);
        self.active = None;
        self.current = None;
        task.mark_done();
        tracing::info!(task_id = %task.id, name = %task.name, "countdown finished");
        TickOutcome::Expired(HistoryEntry::new(task, now))
    }
}

/// Format seconds as a zero-padded `HH:MM:SS` countdown display.
pub fn format_hms(secs: u32) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
