/// Persistence tests for the file-backed habit tracker
use habit_tracker::*;
use chrono::{Duration, NaiveDate};
use tempfile::tempdir;

#[cfg(test)]
mod tracker_persistence_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 14).unwrap()
    }

    #[test]
    fn test_round_trip_reproduces_records() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("habits.json");

        let mut tracker = HabitTracker::new(JsonFileStorage::new(&path));
        tracker.add_habit_at("Exercise", "30 minutes daily", today() - Duration::days(20)).unwrap();
        tracker.add_habit_at("Read", "", today() - Duration::days(5)).unwrap();
        for n in [15, 14, 13, 1, 0] {
            tracker.complete_habit_on("Exercise", today() - Duration::days(n), today()).unwrap();
        }
        tracker.complete_habit_on("Read", today() - Duration::days(2), today()).unwrap();

        let before: Vec<HabitDetails> = ["Exercise", "Read"]
            .iter()
            .map(|name| tracker.get_habit_details_at(name, today()).unwrap())
            .collect();

        let reloaded = HabitTracker::new(JsonFileStorage::new(&path));
        let after: Vec<HabitDetails> = ["Exercise", "Read"]
            .iter()
            .map(|name| reloaded.get_habit_details_at(name, today()).unwrap())
            .collect();

        assert_eq!(before, after);
        assert_eq!(after[0].summary.current_streak, 2);
        assert_eq!(after[0].summary.longest_streak, 3);
        assert_eq!(after[0].summary.description, "30 minutes daily");
        assert_eq!(after[1].summary.created_date, today() - Duration::days(5));
        assert_eq!(reloaded.storage().load(), tracker.storage().load());
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("habits.json");

        let mut tracker = HabitTracker::new(JsonFileStorage::new(&path));
        tracker.add_habit_at("Stretch", "", today()).unwrap();
        assert!(HabitTracker::new(JsonFileStorage::new(&path)).habit("Stretch").is_some());

        tracker.complete_habit_on("Stretch", today(), today()).unwrap();
        let reloaded = HabitTracker::new(JsonFileStorage::new(&path));
        assert_eq!(reloaded.habit("Stretch").unwrap().total_completions(), 1);

        tracker.delete_habit("Stretch").unwrap();
        let reloaded = HabitTracker::new(JsonFileStorage::new(&path));
        assert!(reloaded.habit("Stretch").is_none());
        assert!(reloaded.list_habits_at(today()).is_empty());
    }

    #[test]
    fn test_failed_operations_leave_file_untouched() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("habits.json");

        let mut tracker = HabitTracker::new(JsonFileStorage::new(&path));
        tracker.add_habit_at("Stretch", "Morning", today()).unwrap();
        tracker.complete_habit_on("Stretch", today(), today()).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();

        assert!(!tracker.add_habit_at("Stretch", "Evening", today()).unwrap());
        assert!(!tracker.complete_habit_on("Stretch", today(), today()).unwrap());
        assert!(!tracker.complete_habit_on("Missing", today(), today()).unwrap());
        assert!(!tracker.delete_habit("Missing").unwrap());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("habits.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let mut tracker = HabitTracker::new(JsonFileStorage::new(&path));
        assert!(tracker.list_habits_at(today()).is_empty());

        assert!(tracker.add_habit_at("Fresh", "", today()).unwrap());
        let reloaded = HabitTracker::new(JsonFileStorage::new(&path));
        assert_eq!(reloaded.list_habits_at(today()).len(), 1);
    }
}
