/// Streak calculation
///
/// This module defines the Streak struct that holds the two derived streak
/// numbers for a habit, and the calculation that produces them from a set of
/// completion dates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Derived streak information for a habit
///
/// Both values are fully determined by the completion set and the date the
/// calculation was run for. They are never updated independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed days ending today
    pub current_streak: u32,
    /// Longest run of consecutive completed days anywhere in the history
    pub longest_streak: u32,
}

impl Streak {
    /// Calculate streaks from completion dates given in any order
    ///
    /// Duplicates are collapsed before the scan.
    pub fn from_dates<I>(dates: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let completions: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self::calculate(&completions, today)
    }

    /// Calculate streaks from an ascending completion set
    pub fn calculate(completions: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        if completions.is_empty() {
            return Self::default();
        }

        let current_streak = Self::calculate_current_streak(completions, today);
        let longest_streak = Self::calculate_longest_streak(completions);

        Self {
            current_streak,
            longest_streak: longest_streak.max(current_streak),
        }
    }

    /// Get a motivational message based on the current streak
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", self.current_streak),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", self.current_streak),
        }
    }

    /// Count back from today while each day is in the set
    ///
    /// Completions after today are skipped; the first missing day ends the run.
    fn calculate_current_streak(completions: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
        let mut current_streak = 0;
        let mut checking_date = today;

        for &date in completions.range(..=today).rev() {
            if date != checking_date {
                break;
            }
            current_streak += 1;
            match checking_date.pred_opt() {
                Some(previous) => checking_date = previous,
                None => break,
            }
        }

        current_streak
    }

    /// Longest run of adjacent days in ascending order
    fn calculate_longest_streak(completions: &BTreeSet<NaiveDate>) -> u32 {
        let mut longest_streak = 1;
        let mut running = 1;

        let mut dates = completions.iter();
        let Some(mut last_date) = dates.next().copied() else {
            return 0;
        };

        for &date in dates {
            if (date - last_date).num_days() == 1 {
                running += 1;
                longest_streak = longest_streak.max(running);
            } else {
                running = 1;
            }
            last_date = date;
        }

        longest_streak
    }
}
