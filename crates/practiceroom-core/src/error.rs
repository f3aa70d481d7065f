//! Core error types for practiceroom-core.
//!
//! User intents fail with [`CoreError::Validation`], [`CoreError::NotFound`]
//! or [`CoreError::InvalidState`]. Storage and config failures carry their
//! own sub-enums so callers can tell a bad form input from a broken disk.

use std::path::PathBuf;
use thiserror::Error;

use crate::task::{TaskId, TaskStatus};

/// Core error type for practiceroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task creation input was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation referenced a task id that is not in the store
    #[error("Task not found: {id}")]
    NotFound { id: TaskId },

    /// Operation is not allowed for the task's current status
    #[error("Task {id} cannot be started: status is {status}")]
    InvalidState { id: TaskId, status: TaskStatus },

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for task creation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty
    #[error("'{field}' must not be empty")]
    EmptyField { field: String },

    /// Time of day was not `HH:MM`
    #[error("Invalid time of day '{value}': expected HH:MM")]
    InvalidTime { value: String },

    /// Duration was zero or not a number
    #[error("Invalid duration '{value}': expected a positive number of minutes")]
    InvalidDuration { value: String },

    /// Stored countdown lies outside `0..=duration*60`
    #[error("Invalid remaining time {remaining}s: planned length is {total}s")]
    InvalidRemaining { remaining: u32, total: u32 },
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Storage refused the write (quota, disabled storage)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
