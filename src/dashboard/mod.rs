/// Web dashboard variant of the tracker
///
/// The dashboard tracks a list of tasks over a configurable window of days.
/// All of its state lives in one explicit `DashboardState` value; the server
/// module owns that value and hands it to each request handler.

pub mod series;
pub mod server;
pub mod state;

pub use series::*;
pub use server::{router, AppState};
pub use state::*;

use thiserror::Error;
use crate::storage::StorageError;

/// Errors that can occur during dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Bad user input; the message is meant to be shown as-is
    #[error("{0}")]
    Validation(String),

    #[error("Unknown task: {0}")]
    TaskNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
