/// Storage layer for persisting habit data
///
/// This module handles reading and writing the flat JSON files the tracker
/// keeps its state in. It provides a small interface for loading the whole
/// habit record and writing it back after every change.

pub mod json;

// Re-export the main storage types
pub use json::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::Habit;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File access error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything the CLI tracker persists, keyed by habit name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitData {
    #[serde(default)]
    pub habits: BTreeMap<String, Habit>,
}

/// Trait defining the storage interface for habits
///
/// Loading never fails: a missing or unreadable store is treated as an empty
/// one. Saving replaces the whole stored record.
pub trait HabitStorage {
    /// Load the full habit record
    fn load(&self) -> HabitData;

    /// Replace the stored record with `data`
    fn save(&self, data: &HabitData) -> Result<(), StorageError>;
}
