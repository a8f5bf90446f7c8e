/// Completion history derived from the dashboard state
///
/// Produces the daily completion-percentage series behind the chart, the CSV
/// export of that series and the checklist grid.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::dashboard::{DashboardState, Task};
use crate::domain::{format_date, GraphView};

/// One day of the completion chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionPoint {
    pub date: NaiveDate,
    /// Share of tasks checked that day, 0-100
    pub percentage: u32,
}

/// One cell of the daily checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistCell {
    pub date: NaiveDate,
    pub checked: bool,
    pub is_today: bool,
    /// Future days are shown but cannot be checked
    pub disabled: bool,
}

/// One task row of the daily checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub task: Task,
    pub cells: Vec<ChecklistCell>,
}

/// Daily completion percentages from the start date up to today
///
/// Stops after `total_days` points even if today is further away.
pub fn completion_series(state: &DashboardState, today: NaiveDate) -> Vec<CompletionPoint> {
    let mut history = Vec::new();
    let mut date = state.config.start_date;

    while date <= today && history.len() < state.config.total_days as usize {
        let completed = state
            .tasks
            .iter()
            .filter(|task| state.is_checked(date, &task.id))
            .count();

        history.push(CompletionPoint {
            date,
            percentage: completion_percentage(completed, state.tasks.len()),
        });
        date += Duration::days(1);
    }

    history
}

/// Keep only the trailing points a view covers
pub fn filter_view(points: &[CompletionPoint], view: GraphView) -> Vec<CompletionPoint> {
    let keep = view.window().unwrap_or(points.len()).min(points.len());
    points[points.len() - keep..].to_vec()
}

/// Render points as CSV with a header row
pub fn to_csv(points: &[CompletionPoint]) -> String {
    let mut csv = String::from("Date,Completion (%)\n");
    for point in points {
        csv.push_str(&format!("{},{}\n", format_date(point.date), point.percentage));
    }
    csv
}

/// Download file name for an exported view
pub fn csv_file_name(view: GraphView) -> String {
    format!("habit_tracker_completion_{}.csv", view.as_str())
}

/// The checklist grid over every day of the full series
pub fn checklist(state: &DashboardState, today: NaiveDate) -> Vec<ChecklistRow> {
    let dates: Vec<NaiveDate> = completion_series(state, today).iter().map(|p| p.date).collect();

    state
        .tasks
        .iter()
        .map(|task| ChecklistRow {
            task: task.clone(),
            cells: dates
                .iter()
                .map(|&date| ChecklistCell {
                    date,
                    checked: state.is_checked(date, &task.id),
                    is_today: date == today,
                    disabled: date > today,
                })
                .collect(),
        })
        .collect()
}

/// Percentage rounded half to even; zero when there are no tasks
fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round_ties_even() as u32
}
