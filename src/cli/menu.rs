/// Interactive text menu for the habit tracker
///
/// The menu reads one answer per line and writes its prompts and reports to
/// the given output. It is generic over both so the whole interaction can be
/// driven from a test.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::domain::Streak;
use crate::storage::HabitStorage;
use crate::tracker::{HabitTracker, RECENT_COMPLETIONS};
use crate::TrackerError;

/// A menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddHabit,
    CompleteHabit,
    ViewHabits,
    ViewDetails,
    DeleteHabit,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddHabit),
            "2" => Some(Self::CompleteHabit),
            "3" => Some(Self::ViewHabits),
            "4" => Some(Self::ViewDetails),
            "5" => Some(Self::DeleteHabit),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// The interactive menu session
pub struct Menu<S: HabitStorage, R: BufRead, W: Write> {
    tracker: HabitTracker<S>,
    input: R,
    output: W,
}

impl<S: HabitStorage, R: BufRead, W: Write> Menu<S, R, W> {
    pub fn new(tracker: HabitTracker<S>, input: R, output: W) -> Self {
        Self { tracker, input, output }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<(), TrackerError> {
        info!("Starting interactive menu");

        loop {
            self.print_menu()?;
            let Some(answer) = self.prompt("\nEnter your choice (1-6): ")? else {
                debug!("Input closed, leaving menu");
                break;
            };

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::AddHabit) => self.add_habit()?,
                Some(MenuChoice::CompleteHabit) => self.complete_habit()?,
                Some(MenuChoice::ViewHabits) => self.view_habits()?,
                Some(MenuChoice::ViewDetails) => self.view_details()?,
                Some(MenuChoice::DeleteHabit) => self.delete_habit()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "\nThank you for using Personal Habit Tracker!")?;
                    writeln!(self.output, "Keep improving 1% every day! 🚀")?;
                    break;
                }
                None => {
                    writeln!(self.output, "Invalid choice. Please enter a number between 1 and 6.")?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Hand the tracker back once the session is over
    pub fn into_tracker(self) -> HabitTracker<S> {
        self.tracker
    }

    fn print_menu(&mut self) -> std::io::Result<()> {
        let rule = "=".repeat(50);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "{:^50}", "Personal Habit Tracker - OnePercent")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "\n1. Add a new habit")?;
        writeln!(self.output, "2. Complete a habit for today")?;
        writeln!(self.output, "3. View all habits")?;
        writeln!(self.output, "4. View habit details")?;
        writeln!(self.output, "5. Delete a habit")?;
        writeln!(self.output, "6. Exit")?;
        writeln!(self.output, "{}", "-".repeat(50))
    }

    /// Print `message` and read one trimmed line; None at end of input
    fn prompt(&mut self, message: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn add_habit(&mut self) -> Result<(), TrackerError> {
        let name = self.prompt("Enter habit name: ")?.unwrap_or_default();
        let description = self.prompt("Enter habit description (optional): ")?.unwrap_or_default();

        match self.tracker.add_habit(&name, &description) {
            Ok(true) => writeln!(self.output, "✓ Habit '{}' added successfully!", name)?,
            Ok(false) => writeln!(self.output, "✗ Habit '{}' already exists!", name)?,
            Err(TrackerError::Domain(err)) => writeln!(self.output, "✗ {}", err)?,
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn complete_habit(&mut self) -> Result<(), TrackerError> {
        let habits = self.tracker.list_habits();
        if habits.is_empty() {
            writeln!(self.output, "No habits found. Add a habit first!")?;
            return Ok(());
        }

        writeln!(self.output, "\nYour habits:")?;
        for (i, habit) in habits.iter().enumerate() {
            writeln!(self.output, "{}. {} {}", i + 1, status_mark(habit.completed_today), habit.name)?;
        }

        let name = self.prompt("\nEnter habit name to complete: ")?.unwrap_or_default();
        if self.tracker.complete_habit(&name)? {
            writeln!(self.output, "✓ Marked '{}' as complete for today!", name)?;
        } else {
            writeln!(
                self.output,
                "✗ Could not complete habit. Either it doesn't exist or already completed today."
            )?;
        }
        Ok(())
    }

    fn view_habits(&mut self) -> Result<(), TrackerError> {
        let habits = self.tracker.list_habits();
        if habits.is_empty() {
            writeln!(self.output, "\nNo habits found. Add a habit first!")?;
            return Ok(());
        }

        let rule = "=".repeat(70);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "{:^70}", "Your Habits")?;
        writeln!(self.output, "{}", rule)?;

        for habit in &habits {
            writeln!(self.output, "\n{} {}", status_mark(habit.completed_today), habit.name)?;
            if !habit.description.is_empty() {
                writeln!(self.output, "   Description: {}", habit.description)?;
            }
            writeln!(
                self.output,
                "   Streak: {} days (Longest: {})",
                habit.current_streak, habit.longest_streak
            )?;
            writeln!(self.output, "   Total completions: {}", habit.total_completions)?;
        }

        writeln!(self.output, "{}", "-".repeat(70))?;
        Ok(())
    }

    fn view_details(&mut self) -> Result<(), TrackerError> {
        let name = self.prompt("Enter habit name: ")?.unwrap_or_default();
        let Some(details) = self.tracker.get_habit_details(&name) else {
            writeln!(self.output, "✗ Habit '{}' not found!", name)?;
            return Ok(());
        };
        let summary = &details.summary;

        let rule = "=".repeat(50);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "{:^50}", summary.name)?;
        writeln!(self.output, "{}", rule)?;
        if !summary.description.is_empty() {
            writeln!(self.output, "Description: {}", summary.description)?;
        }
        writeln!(self.output, "Created: {}", summary.created_date)?;
        writeln!(self.output, "Current Streak: {} days", summary.current_streak)?;
        writeln!(self.output, "Longest Streak: {} days", summary.longest_streak)?;
        writeln!(self.output, "Total Completions: {}", summary.total_completions)?;
        writeln!(
            self.output,
            "Completed Today: {}",
            if summary.completed_today { "Yes" } else { "No" }
        )?;

        let streak = Streak {
            current_streak: summary.current_streak,
            longest_streak: summary.longest_streak,
        };
        writeln!(self.output, "{}", streak.motivational_message())?;

        if !details.completions.is_empty() {
            writeln!(self.output, "\nRecent completions (last {}):", RECENT_COMPLETIONS)?;
            let skip = details.completions.len().saturating_sub(RECENT_COMPLETIONS);
            for date in &details.completions[skip..] {
                writeln!(self.output, "  - {}", date)?;
            }
        }
        writeln!(self.output, "{}", "-".repeat(50))?;
        Ok(())
    }

    fn delete_habit(&mut self) -> Result<(), TrackerError> {
        let name = self.prompt("Enter habit name to delete: ")?.unwrap_or_default();
        let confirm = self
            .prompt(&format!("Are you sure you want to delete '{}'? (yes/no): ", name))?
            .unwrap_or_default()
            .to_lowercase();

        if confirm != "yes" {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(());
        }

        if self.tracker.delete_habit(&name)? {
            writeln!(self.output, "✓ Habit '{}' deleted successfully!", name)?;
        } else {
            writeln!(self.output, "✗ Habit '{}' not found!", name)?;
        }
        Ok(())
    }
}

fn status_mark(completed_today: bool) -> &'static str {
    if completed_today { "✓" } else { "○" }
}
