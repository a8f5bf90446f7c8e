/// JSON file implementation of the habit storage interface
///
/// Both the CLI tracker and the dashboard keep their state in a single
/// pretty-printed JSON file that is rewritten in full on every save.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::storage::{HabitData, HabitStorage, StorageError};

/// Read a JSON document, falling back to `T::default()`
///
/// A missing file is the normal first-run case. An unreadable or unparsable
/// file is logged and also treated as empty.
pub fn read_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match std::fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                warn!("failed to parse data file {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no data file at {}, starting empty", path.display());
            T::default()
        }
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            T::default()
        }
    }
}

/// Write `data` as pretty-printed JSON, creating parent directories
pub fn write_json_pretty<T>(path: &Path, data: &T) -> Result<(), StorageError>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let payload = serde_json::to_vec_pretty(data)?;
    std::fs::write(path, payload)?;
    Ok(())
}

/// Async counterpart of `write_json_pretty` for use inside request handlers
pub async fn persist_json<T>(path: &Path, data: &T) -> Result<(), StorageError>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let payload = serde_json::to_vec_pretty(data)?;
    tokio::fs::write(path, payload).await?;
    Ok(())
}

/// File-backed storage for the CLI tracker
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HabitStorage for JsonFileStorage {
    fn load(&self) -> HabitData {
        let data: HabitData = read_json_or_default(&self.path);
        debug!("Loaded {} habits from {}", data.habits.len(), self.path.display());
        data
    }

    fn save(&self, data: &HabitData) -> Result<(), StorageError> {
        write_json_pretty(&self.path, data)?;
        debug!("Saved {} habits to {}", data.habits.len(), self.path.display());
        Ok(())
    }
}
