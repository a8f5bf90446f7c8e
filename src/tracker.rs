/// Habit store used by the command-line tracker
///
/// The tracker owns the full habit record loaded from storage, applies the
/// add / complete / delete operations to it and writes the whole record back
/// after every successful change.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{self, DomainError, Habit, Streak};
use crate::storage::{HabitData, HabitStorage};
use crate::TrackerError;

/// How many completion dates the detail view shows
pub const RECENT_COMPLETIONS: usize = 10;

/// Information about a habit in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub name: String,
    pub description: String,
    pub created_date: NaiveDate,
    pub total_completions: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}

/// Full information about one habit, including its completion history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDetails {
    #[serde(flatten)]
    pub summary: HabitSummary,
    /// Every completion date, ascending
    pub completions: Vec<NaiveDate>,
}

/// The single-user habit store
pub struct HabitTracker<S: HabitStorage> {
    storage: S,
    data: HabitData,
}

impl<S: HabitStorage> HabitTracker<S> {
    /// Load the tracker's state from `storage`
    pub fn new(storage: S) -> Self {
        let data = storage.load();
        info!("Habit tracker loaded with {} habits", data.habits.len());
        Self { storage, data }
    }

    /// Add a new habit created today
    ///
    /// Returns `Ok(false)` if a habit with this exact name already exists; the
    /// existing record is left untouched.
    pub fn add_habit(&mut self, name: &str, description: &str) -> Result<bool, TrackerError> {
        self.add_habit_at(name, description, domain::today())
    }

    /// Add a new habit with an explicit creation date
    pub fn add_habit_at(
        &mut self,
        name: &str,
        description: &str,
        created_date: NaiveDate,
    ) -> Result<bool, TrackerError> {
        Habit::validate_name(name)?;
        if self.data.habits.contains_key(name) {
            debug!("Refusing to add duplicate habit '{}'", name);
            return Ok(false);
        }

        let habit = Habit::new(description.to_string(), created_date)?;
        let mut data = self.data.clone();
        data.habits.insert(name.to_string(), habit);
        self.commit(data)?;

        info!("Added habit '{}'", name);
        Ok(true)
    }

    /// Mark a habit as completed today
    pub fn complete_habit(&mut self, name: &str) -> Result<bool, TrackerError> {
        let today = domain::today();
        self.complete_habit_on(name, today, today)
    }

    /// Mark a habit as completed on `date`
    ///
    /// Returns `Ok(false)` if the habit does not exist or the date is already
    /// recorded; nothing is saved in that case.
    pub fn complete_habit_on(
        &mut self,
        name: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<bool, TrackerError> {
        if date > today {
            return Err(DomainError::InvalidDate("Cannot complete habits for future dates".to_string()).into());
        }

        let mut data = self.data.clone();
        let Some(habit) = data.habits.get_mut(name) else {
            return Ok(false);
        };
        if !habit.record_completion(date, today) {
            return Ok(false);
        }

        debug!(
            "Completed '{}' on {} (current streak {}, longest {})",
            name, date, habit.current_streak, habit.longest_streak
        );
        self.commit(data)?;
        Ok(true)
    }

    /// Remove the completion of a habit on `date`
    ///
    /// Returns `Ok(false)` if the habit does not exist or was not completed on
    /// that date.
    pub fn uncomplete_habit_on(
        &mut self,
        name: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<bool, TrackerError> {
        let mut data = self.data.clone();
        let Some(habit) = data.habits.get_mut(name) else {
            return Ok(false);
        };
        if !habit.remove_completion(date, today) {
            return Ok(false);
        }

        debug!("Removed completion of '{}' on {}", name, date);
        self.commit(data)?;
        Ok(true)
    }

    /// Delete a habit and its whole history
    pub fn delete_habit(&mut self, name: &str) -> Result<bool, TrackerError> {
        let mut data = self.data.clone();
        if data.habits.remove(name).is_none() {
            return Ok(false);
        }

        self.commit(data)?;
        info!("Deleted habit '{}'", name);
        Ok(true)
    }

    /// Summaries of every habit, ordered by name
    pub fn list_habits(&self) -> Vec<HabitSummary> {
        self.list_habits_at(domain::today())
    }

    pub fn list_habits_at(&self, today: NaiveDate) -> Vec<HabitSummary> {
        self.data
            .habits
            .iter()
            .map(|(name, habit)| summarize(name, habit, today))
            .collect()
    }

    /// Detailed information about one habit
    pub fn get_habit_details(&self, name: &str) -> Option<HabitDetails> {
        self.get_habit_details_at(name, domain::today())
    }

    pub fn get_habit_details_at(&self, name: &str, today: NaiveDate) -> Option<HabitDetails> {
        let habit = self.data.habits.get(name)?;
        Some(HabitDetails {
            summary: summarize(name, habit, today),
            completions: habit.completions.iter().copied().collect(),
        })
    }

    /// Look up the raw record for a habit
    pub fn habit(&self, name: &str) -> Option<&Habit> {
        self.data.habits.get(name)
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Save `data` and adopt it; on a failed save the current state stays
    fn commit(&mut self, data: HabitData) -> Result<(), TrackerError> {
        self.storage.save(&data)?;
        self.data = data;
        Ok(())
    }
}

/// Streaks are recomputed against `today` so a lapsed habit reads as broken
fn summarize(name: &str, habit: &Habit, today: NaiveDate) -> HabitSummary {
    let streak = Streak::calculate(&habit.completions, today);
    HabitSummary {
        name: name.to_string(),
        description: habit.description.clone(),
        created_date: habit.created_date,
        total_completions: habit.total_completions(),
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        completed_today: habit.is_completed_on(today),
    }
}
