mod clock;
mod engine;
mod port;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{format_hms, TickOutcome, TimerEngine, TimerState};
pub use port::{IntervalScheduler, ScheduleToken, Scheduler};
