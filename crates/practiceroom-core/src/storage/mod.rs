mod config;
pub mod database;
pub mod memory;

pub use config::{Config, HistoryConfig, NotificationsConfig, SchedulerConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Key of the persisted task array.
pub const TASKS_KEY: &str = "practice_tasks";
/// Key of the persisted history array.
pub const HISTORY_KEY: &str = "practice_history";
/// Key of the theme flag (`"true"` / `"false"`).
pub const DARK_MODE_KEY: &str = "dark_mode";
/// Key of the task id a bare `resume` picks up; empty when there is none.
pub const CURRENT_TASK_KEY: &str = "current_task";

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read a JSON array blob. A missing key is an empty collection.
pub fn load_json_vec<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>> {
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub fn save_json<T: serde::Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Returns the data directory.
///
/// `PRACTICEROOM_DATA_DIR` wins when set. Otherwise `~/.config/practiceroom/`,
/// or `~/.config/practiceroom-dev/` with `PRACTICEROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PRACTICEROOM_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PRACTICEROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("practiceroom-dev")
            } else {
                base_dir.join("practiceroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_blob_loads_as_empty() {
        let store = MemoryStore::new();
        let tasks: Vec<crate::task::Task> = load_json_vec(&store, TASKS_KEY).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(TASKS_KEY, "{not json").unwrap();
        let result: Result<Vec<crate::task::Task>> = load_json_vec(&store, TASKS_KEY);
        assert!(matches!(result, Err(crate::error::CoreError::Json(_))));
    }
}
