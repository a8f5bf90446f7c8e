/// Core types and helpers used throughout the domain layer
///
/// Dates cross every boundary of this crate as ISO-8601 calendar dates
/// (`YYYY-MM-DD`). This module owns the parsing and formatting rules for them
/// and the chart view selector shared by the dashboard.

use serde::{Deserialize, Serialize};
use chrono::{Local, NaiveDate};
use crate::domain::DomainError;

/// Format used for every persisted and displayed calendar date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The current calendar date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string into a calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s.trim())))
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Which slice of the completion history a chart or export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphView {
    /// The last 7 tracked days
    #[default]
    Week,
    /// The last 30 tracked days
    Month,
    /// Everything tracked so far
    All,
}

impl GraphView {
    /// How many trailing days this view keeps (None keeps everything)
    pub fn window(&self) -> Option<usize> {
        match self {
            GraphView::Week => Some(7),
            GraphView::Month => Some(30),
            GraphView::All => None,
        }
    }

    /// Human readable period label used in chart titles
    pub fn period_label(&self) -> &'static str {
        match self {
            GraphView::Week => "Last 7 Days",
            GraphView::Month => "Last 30 Days",
            GraphView::All => "All Time",
        }
    }

    /// Short lowercase key, as used in query strings and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphView::Week => "week",
            GraphView::Month => "month",
            GraphView::All => "all",
        }
    }
}
