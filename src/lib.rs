/// Public library interface for the habit tracker
///
/// This module exports the streak calculation, the file-backed habit store,
/// the interactive menu, the dashboard and the motivation generator so they
/// can be used by the binary or by tests.

use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tracker;

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod motivation;

// Re-export public modules and types
pub use domain::*;
pub use storage::{persist_json, read_json_or_default, write_json_pretty, HabitData, HabitStorage, JsonFileStorage, StorageError};
pub use tracker::{HabitDetails, HabitSummary, HabitTracker, RECENT_COMPLETIONS};

/// Errors that can occur while operating the habit tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("{0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
