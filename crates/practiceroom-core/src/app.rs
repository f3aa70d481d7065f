//! Application controller.
//!
//! [`PracticeApp`] owns every piece of mutable state: the task store, the
//! history log, the timer engine's single countdown slot, the due sweep and
//! the scheduler they register with. Each intent runs to completion as
//! "mutate, persist, return events", so the durable store never lags a
//! finished call.
//!
//! Persistence failures do not fail the intent. They are logged, queued for
//! [`PracticeApp::take_warnings`], and the in-memory state stays authoritative.

use chrono::{DateTime, Local, Utc};

use crate::due::DueScheduler;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::history::{HistoryEntry, HistoryLog};
use crate::stats::WeeklyStats;
use crate::storage::{
    load_json_vec, save_json, Config, KeyValueStore, CURRENT_TASK_KEY, DARK_MODE_KEY, HISTORY_KEY,
    TASKS_KEY,
};
use crate::task::{Task, TaskId, TaskStore, TimeOfDay};
use crate::timer::{Clock, IntervalScheduler, TickOutcome, TimerEngine, TimerState};

pub struct PracticeApp {
    tasks: TaskStore,
    history: HistoryLog,
    timer: TimerEngine,
    due: DueScheduler,
    scheduler: IntervalScheduler,
    dark_mode: bool,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    warnings: Vec<String>,
}

impl PracticeApp {
    /// Load tasks, history, the theme flag and the task to resume from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read, a blob is corrupt, or a
    /// stored task breaks the rules enforced at creation
    /// ([`CoreError::Validation`]).
    pub fn load(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        config: &Config,
    ) -> Result<Self> {
        let tasks: Vec<Task> = load_json_vec(&*store, TASKS_KEY)?;
        let entries: Vec<HistoryEntry> = load_json_vec(&*store, HISTORY_KEY)?;
        for task in tasks.iter().chain(entries.iter().map(|e| &e.task)) {
            task.validate().inspect_err(|e| {
                tracing::error!(task_id = %task.id, error = %e, "stored task rejected");
            })?;
        }
        let tasks = TaskStore::from_tasks(tasks);
        let history = HistoryLog::from_entries(entries);
        let dark_mode = store.get(DARK_MODE_KEY)?.as_deref() == Some("true");

        let mut timer = TimerEngine::new(config.tick_interval());
        let current = store
            .get(CURRENT_TASK_KEY)?
            .and_then(|raw| raw.parse::<TaskId>().ok())
            .filter(|id| tasks.find_by_id(*id).is_some_and(|t| t.status.can_start()));
        if let Some(id) = current {
            timer.restore(id);
        }

        tracing::debug!(
            tasks = tasks.len(),
            history = history.len(),
            dark_mode,
            current = ?current,
            "loaded practice state"
        );
        Ok(Self {
            tasks,
            history,
            timer,
            due: DueScheduler::new(config.sweep_interval()),
            scheduler: IntervalScheduler::new(),
            dark_mode,
            store,
            clock,
            warnings: Vec::new(),
        })
    }

    /// Initial due sweep, then register the periodic one.
    pub fn boot(&mut self) -> Option<Event> {
        let event = self.sweep_due();
        let now = self.clock.now();
        self.due.install(&mut self.scheduler, now);
        event
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        self.tasks.all()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.find_by_id(id)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.all()
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.timer.active_task().and_then(|id| self.tasks.find_by_id(id))
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Earliest moment something is scheduled to happen.
    pub fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.scheduler.next_deadline()
    }

    /// Timer state plus the running task, or the one `resume` would pick up.
    pub fn snapshot(&self) -> Event {
        let task = self.timer.current_task().and_then(|id| self.tasks.find_by_id(id));
        self.timer.snapshot(task, self.clock.now())
    }

    pub fn weekly_stats(&self) -> WeeklyStats {
        WeeklyStats::from_history(self.history.all(), self.clock.now().date_naive())
    }

    /// Drain persistence warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    // ── Task intents ─────────────────────────────────────────────────

    /// Create a pending task. The returned [`Event::TaskCreated`] carries it.
    ///
    /// # Errors
    /// [`CoreError::Validation`] for empty or malformed fields; nothing is stored.
    pub fn add_task(
        &mut self,
        name: &str,
        category: &str,
        time: &str,
        duration: u32,
    ) -> Result<Event> {
        let now = self.clock.now();
        let task = self
            .tasks
            .add(name, category, time, duration, now.timestamp_millis())?;
        tracing::info!(task_id = %task.id, name = %task.name, "task created");
        self.persist_tasks();
        Ok(Event::TaskCreated {
            task,
            at: now.with_timezone(&Utc),
        })
    }

    /// Remove a task in any status. Unknown ids are a silent no-op.
    ///
    /// If the task's countdown is running it is cancelled.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Event> {
        let removed = self.tasks.remove(id)?;
        let was_current = self.timer.current_task() == Some(id);
        let was_running = self.timer.forget(id, &mut self.scheduler);
        tracing::info!(task_id = %id, name = %removed.name, was_running, "task removed");
        self.persist_tasks();
        if was_current {
            self.persist_current();
        }
        Some(Event::TaskRemoved {
            task_id: id,
            was_running,
            at: self.clock.now().with_timezone(&Utc),
        })
    }

    // ── Timer intents ────────────────────────────────────────────────

    /// Start (or resume) the countdown for `id`, cancelling any other.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] for an unknown id, [`CoreError::InvalidState`]
    /// for a task that is already done.
    pub fn start(&mut self, id: TaskId) -> Result<Event> {
        let now = self.clock.now();
        let task = self.tasks.find_by_id(id).ok_or(CoreError::NotFound { id })?;
        let event = self.timer.start(task, &mut self.scheduler, now)?;
        self.persist_current();
        Ok(event)
    }

    /// Restart the last stopped countdown, including one stopped by an
    /// earlier run against the same store.
    ///
    /// Returns `Ok(None)` when there is nothing to resume.
    ///
    /// # Errors
    /// Same as [`PracticeApp::start`].
    pub fn resume(&mut self) -> Result<Option<Event>> {
        if self.timer.state() == TimerState::Running {
            return Ok(None);
        }
        match self.timer.current_task() {
            Some(id) => self.start(id).map(Some),
            None => Ok(None),
        }
    }

    /// Stop the running countdown, keeping its remaining time.
    pub fn stop(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let task = self.timer.active_task().and_then(|id| self.tasks.find_by_id(id));
        let event = self.timer.stop(task, &mut self.scheduler, now)?;
        self.persist_tasks();
        Some(event)
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Promote reached pending tasks to due and persist.
    pub fn sweep_due(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let promoted = self.due.sweep(&mut self.tasks, TimeOfDay::of(&now));
        self.persist_tasks();
        if promoted.is_empty() {
            return None;
        }
        tracing::info!(count = promoted.len(), "tasks due");
        Some(Event::TasksDue {
            task_ids: promoted,
            at: now.with_timezone(&Utc),
        })
    }

    /// Dispatch every scheduled firing that is due at the current time.
    ///
    /// Returns the resulting events in firing order.
    pub fn pump(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            let now = self.clock.now();
            let Some(token) = self.scheduler.pop_due(now) else {
                break;
            };
            if self.due.token() == Some(token) {
                events.extend(self.sweep_due());
            } else if self.timer.token() == Some(token) {
                events.extend(self.tick(token, now));
            } else {
                tracing::debug!(?token, "dropping firing with no owner");
            }
        }
        events
    }

    fn tick(&mut self, token: crate::timer::ScheduleToken, now: DateTime<Local>) -> Option<Event> {
        let id = self.timer.active_task()?;
        let task = self.tasks.find_by_id_mut(id)?;
        match self.timer.tick(token, task, &mut self.scheduler, now) {
            TickOutcome::Ticked(event) => Some(event),
            TickOutcome::Ignored => None,
            TickOutcome::Expired(entry) => {
                let event = Event::TaskCompleted {
                    task_id: entry.task.id,
                    name: entry.task.name.clone(),
                    category: entry.task.category.clone(),
                    duration_min: entry.task.duration,
                    done_at: now.with_timezone(&Utc),
                };
                self.history.append(entry);
                self.persist_tasks();
                self.persist_history();
                self.persist_current();
                Some(event)
            }
        }
    }

    // ── History & preferences ────────────────────────────────────────

    /// Empty the history log. Callers confirm with the user first.
    pub fn clear_history(&mut self) -> Event {
        let removed = self.history.clear();
        tracing::info!(removed, "history cleared");
        self.persist_history();
        Event::HistoryCleared {
            removed,
            at: self.clock.now().with_timezone(&Utc),
        }
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Event {
        self.dark_mode = dark_mode;
        let value = if dark_mode { "true" } else { "false" };
        if let Err(e) = self.store.set(DARK_MODE_KEY, value) {
            self.warn_persist(DARK_MODE_KEY, &e);
        }
        Event::ThemeChanged {
            dark_mode,
            at: self.clock.now().with_timezone(&Utc),
        }
    }

    pub fn toggle_dark_mode(&mut self) -> Event {
        self.set_dark_mode(!self.dark_mode)
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist_tasks(&mut self) {
        if let Err(e) = save_json(&mut *self.store, TASKS_KEY, self.tasks.all()) {
            self.warn_persist(TASKS_KEY, &e);
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) = save_json(&mut *self.store, HISTORY_KEY, self.history.all()) {
            self.warn_persist(HISTORY_KEY, &e);
        }
    }

    fn persist_current(&mut self) {
        let value = self
            .timer
            .current_task()
            .map(|id| id.to_string())
            .unwrap_or_default();
        if let Err(e) = self.store.set(CURRENT_TASK_KEY, &value) {
            self.warn_persist(CURRENT_TASK_KEY, &e);
        }
    }

    fn warn_persist(&mut self, key: &str, err: &CoreError) {
        tracing::warn!(key, error = %err, "failed to persist; keeping in-memory state");
        self.warnings
            .push(format!("Could not save {key}: {err}. Changes are kept for this session only."));
    }
}
