//! # Practiceroom Core Library
//!
//! Business logic for the Practiceroom practice-task tracker: users define
//! timed practice items, run a countdown against one of them at a time, and
//! review what they finished.
//!
//! ## Architecture
//!
//! - **Task Store**: ordered in-memory task collection, sole mutator of tasks
//! - **History Log**: append-only record of finished sessions
//! - **Timer Engine**: single-slot countdown driven by a scheduling port
//! - **Due Sweep**: periodic promotion of pending tasks whose time has come
//! - **Storage**: key-value persistence (SQLite) and TOML configuration
//!
//! [`PracticeApp`] owns all of the above and is the only entry point front
//! ends need.

pub mod app;
pub mod due;
pub mod error;
pub mod events;
pub mod history;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::PracticeApp;
pub use due::DueScheduler;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use history::{HistoryEntry, HistoryLog};
pub use stats::{DayTotal, WeeklyStats};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use task::{Task, TaskId, TaskStatus, TaskStore, TimeOfDay};
pub use timer::{
    format_hms, Clock, IntervalScheduler, ManualClock, ScheduleToken, Scheduler, SystemClock,
    TimerEngine, TimerState,
};
