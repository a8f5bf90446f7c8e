/// Habit record and related functionality
///
/// This module defines the Habit struct that represents one tracked behavior:
/// its description, when it was created, the days it was completed on and the
/// streak values derived from those days.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{DomainError, Streak};

/// Maximum length of a habit name, in characters
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a habit description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A habit the user wants to do every day
///
/// The habit's name is the key it is stored under, so it is not repeated here.
/// `current_streak` and `longest_streak` are cached copies of the values
/// derived from `completions` and are rewritten whenever the set changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Optional free-text description (empty when not given)
    #[serde(default)]
    pub description: String,
    /// The day this habit was created
    pub created_date: NaiveDate,
    /// Days the habit was completed on, ascending and unique
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl Habit {
    /// Create a new habit with no completions
    pub fn new(description: String, created_date: NaiveDate) -> Result<Self, DomainError> {
        Self::validate_description(&description)?;

        Ok(Self {
            description,
            created_date,
            completions: BTreeSet::new(),
            current_streak: 0,
            longest_streak: 0,
        })
    }

    /// Record a completion for `date`
    ///
    /// Returns false without touching anything if the date is already recorded.
    pub fn record_completion(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if !self.completions.insert(date) {
            return false;
        }
        self.recompute_streaks(today);
        true
    }

    /// Remove the completion for `date`
    ///
    /// Returns false if the date was not recorded.
    pub fn remove_completion(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if !self.completions.remove(&date) {
            return false;
        }
        self.recompute_streaks(today);
        true
    }

    /// Recalculate both cached streak values from the completion set
    pub fn recompute_streaks(&mut self, today: NaiveDate) {
        let streak = Streak::calculate(&self.completions, today);
        self.current_streak = streak.current_streak;
        self.longest_streak = streak.longest_streak;
    }

    /// The cached streak values
    pub fn streak(&self) -> Streak {
        Streak {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    pub fn total_completions(&self) -> usize {
        self.completions.len()
    }

    /// The most recent `limit` completions, oldest first
    pub fn recent_completions(&self, limit: usize) -> Vec<NaiveDate> {
        let skip = self.completions.len().saturating_sub(limit);
        self.completions.iter().skip(skip).copied().collect()
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(
                format!("Habit name cannot be longer than {} characters", MAX_NAME_LEN)
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::Validation {
                message: format!("Description cannot be longer than {} characters", MAX_DESCRIPTION_LEN)
            });
        }
        Ok(())
    }
}
