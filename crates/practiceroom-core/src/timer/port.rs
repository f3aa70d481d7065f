//! Repeating-callback scheduling port.
//!
//! The timer engine and the due sweep never sleep. They register repeating
//! schedules here and get a [`ScheduleToken`] back; a driver (tokio in the
//! CLI, a [`ManualClock`](super::ManualClock) in tests) asks
//! [`IntervalScheduler::pop_due`] which token fires next and routes it.

use chrono::{DateTime, Local};
use std::time::Duration;

/// Handle of one repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleToken(u64);

pub trait Scheduler {
    /// Register a schedule that first fires one `period` after `now`.
    fn schedule_repeating(&mut self, period: Duration, now: DateTime<Local>) -> ScheduleToken;

    /// Cancel a schedule. Cancelling an unknown or cancelled token is a no-op.
    fn cancel(&mut self, token: ScheduleToken);

    fn is_scheduled(&self, token: ScheduleToken) -> bool;
}

#[derive(Debug, Clone)]
struct Registration {
    token: ScheduleToken,
    period: chrono::Duration,
    next: DateTime<Local>,
}

/// Deadline-based scheduler. Single-threaded; the owner polls it.
#[derive(Debug, Clone, Default)]
pub struct IntervalScheduler {
    next_token: u64,
    registrations: Vec<Registration>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.registrations.iter().map(|r| r.next).min()
    }

    /// Pop the earliest schedule whose deadline is at or before `now`.
    ///
    /// The popped schedule is re-armed one period later, so a driver that
    /// wakes late gets one firing per missed period. Ties go to the schedule
    /// registered first.
    pub fn pop_due(&mut self, now: DateTime<Local>) -> Option<ScheduleToken> {
        let reg = self
            .registrations
            .iter_mut()
            .filter(|r| r.next <= now)
            .min_by_key(|r| (r.next, r.token))?;
        reg.next += reg.period;
        Some(reg.token)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, period: Duration, now: DateTime<Local>) -> ScheduleToken {
        let period = chrono::Duration::from_std(period)
            .ok()
            .filter(|p| *p > chrono::Duration::zero())
            .unwrap_or_else(|| chrono::Duration::milliseconds(1));
        self.next_token += 1;
        let token = ScheduleToken(self.next_token);
        self.registrations.push(Registration {
            token,
            period,
            next: now + period,
        });
        token
    }

    fn cancel(&mut self, token: ScheduleToken) {
        self.registrations.retain(|r| r.token != token);
    }

    fn is_scheduled(&self, token: ScheduleToken) -> bool {
        self.registrations.iter().any(|r| r.token == token)
    }
}
