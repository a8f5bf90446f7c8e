/// Dashboard state and the operations that mutate it
///
/// Every operation takes the state explicitly and either applies the whole
/// change or returns an error without touching anything.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::dashboard::DashboardError;
use crate::domain;

/// Default number of days a new tracker covers
pub const DEFAULT_TOTAL_DAYS: u32 = 7;

/// Longest tracking window a user can configure
pub const MAX_TOTAL_DAYS: u32 = 365;

/// Identifier of a dashboard task
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a fresh random task ID
    pub fn new() -> Self {
        Self(format!("task-{}", Uuid::new_v4()))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A task shown as one row of the daily checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
}

/// The tracking window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// First tracked day
    pub start_date: NaiveDate,
    /// Number of days tracked from `start_date`
    pub total_days: u32,
}

/// Everything the dashboard knows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub config: TrackerConfig,
    pub tasks: Vec<Task>,
    /// Checked cells only: day → task → true
    #[serde(default)]
    pub daily_status: BTreeMap<NaiveDate, BTreeMap<TaskId, bool>>,
    #[serde(default)]
    pub last_motivation_date: Option<NaiveDate>,
    #[serde(default)]
    pub daily_motivation: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(domain::today())
    }
}

impl DashboardState {
    /// A fresh dashboard seeded with two starter tasks
    pub fn new(today: NaiveDate) -> Self {
        Self {
            config: TrackerConfig {
                start_date: today,
                total_days: DEFAULT_TOTAL_DAYS,
            },
            tasks: vec![
                Task { id: TaskId::from("task-1"), name: "Drink 8 Glasses of Water".to_string() },
                Task { id: TaskId::from("task-2"), name: "30 Minutes of Exercise".to_string() },
            ],
            daily_status: BTreeMap::new(),
            last_motivation_date: None,
            daily_motivation: None,
        }
    }

    /// Append a task; the name is trimmed and must not be empty
    pub fn add_task(&mut self, name: &str) -> Result<Task, DashboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("Please enter a task name."));
        }

        let task = Task { id: TaskId::new(), name: name.to_string() };
        self.tasks.push(task.clone());
        debug!("Added dashboard task {} ({})", task.name, task.id);
        Ok(task)
    }

    /// Remove a task together with its checked days
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            return false;
        }

        for status in self.daily_status.values_mut() {
            status.remove(id);
        }
        self.daily_status.retain(|_, status| !status.is_empty());
        debug!("Removed dashboard task {}", id);
        true
    }

    /// Check or uncheck a task for a day
    ///
    /// Unchecking deletes the cell so that only completed cells are stored.
    pub fn set_task_status(
        &mut self,
        date: NaiveDate,
        id: &TaskId,
        complete: bool,
        today: NaiveDate,
    ) -> Result<(), DashboardError> {
        if date > today {
            return Err(DashboardError::validation("Cannot check off future tasks."));
        }
        if !self.tasks.iter().any(|t| &t.id == id) {
            return Err(DashboardError::TaskNotFound(id.to_string()));
        }

        if complete {
            self.daily_status.entry(date).or_default().insert(id.clone(), true);
        } else if let Some(status) = self.daily_status.get_mut(&date) {
            status.remove(id);
            if status.is_empty() {
                self.daily_status.remove(&date);
            }
        }
        Ok(())
    }

    pub fn is_checked(&self, date: NaiveDate, id: &TaskId) -> bool {
        self.daily_status
            .get(&date)
            .and_then(|status| status.get(id))
            .copied()
            .unwrap_or(false)
    }

    /// Change the tracking length; restarts the window today
    pub fn update_config(&mut self, total_days: i64, today: NaiveDate) -> Result<(), DashboardError> {
        if !(1..=i64::from(MAX_TOTAL_DAYS)).contains(&total_days) {
            return Err(DashboardError::validation(format!(
                "Total days must be between 1 and {}.", MAX_TOTAL_DAYS
            )));
        }

        self.config = TrackerConfig {
            start_date: today,
            total_days: total_days as u32,
        };
        Ok(())
    }

    /// Names of every task, comma separated
    pub fn task_list(&self) -> String {
        self.tasks.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Whether today's motivation still has to be produced
    pub fn needs_motivation(&self, today: NaiveDate) -> bool {
        self.last_motivation_date != Some(today)
    }

    /// Store the motivation produced for `today`
    pub fn apply_motivation(&mut self, text: String, today: NaiveDate) {
        self.daily_motivation = Some(text);
        self.last_motivation_date = Some(today);
    }
}
