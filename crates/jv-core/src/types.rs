//! Common data types for jobvac

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::study::TREATMENT_YEAR;

/// One row of the aggregate table: total postings in a given week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    /// Calendar year.
    pub year: i32,
    /// Week of the year (1-based).
    pub week: u32,
    /// Number of job postings in that week.
    pub job_postings_count: f64,
}

/// One row of the industry table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryRecord {
    /// Calendar year.
    pub year: i32,
    /// Week of the year (1-based).
    pub week: u32,
    /// Industry name, as spelled in the source data.
    pub group_name: String,
    /// Number of job postings in that week for the industry.
    pub job_postings_count: f64,
}

/// Fixed week ranges used to scope each regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWindow {
    /// Weeks up to and including 48.
    Overall,
    /// Weeks up to and including 30.
    FirstWave,
    /// Weeks 30 through 48.
    Recovery,
}

impl AnalysisWindow {
    /// All windows, in reporting order.
    pub const ALL: [AnalysisWindow; 3] =
        [AnalysisWindow::Overall, AnalysisWindow::FirstWave, AnalysisWindow::Recovery];

    /// First week included, if the window is bounded below.
    pub fn first_week(self) -> Option<u32> {
        match self {
            AnalysisWindow::Overall | AnalysisWindow::FirstWave => None,
            AnalysisWindow::Recovery => Some(30),
        }
    }

    /// Last week included.
    pub fn last_week(self) -> u32 {
        match self {
            AnalysisWindow::Overall | AnalysisWindow::Recovery => 48,
            AnalysisWindow::FirstWave => 30,
        }
    }

    /// Whether `week` falls inside the window (bounds inclusive).
    pub fn contains(self, week: u32) -> bool {
        week <= self.last_week() && self.first_week().is_none_or(|lo| week >= lo)
    }

    /// Whether the window is estimated with entity and time effects.
    ///
    /// The recovery window is too short for time effects to be identified
    /// alongside the treatment indicator, so it uses plain OLS.
    pub fn uses_panel_effects(self) -> bool {
        !matches!(self, AnalysisWindow::Recovery)
    }

    /// Human-readable label used in tables and charts.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisWindow::Overall => "Overall",
            AnalysisWindow::FirstWave => "First wave",
            AnalysisWindow::Recovery => "Recovery phase",
        }
    }

    /// Parse a window from its snake_case name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overall" => Some(Self::Overall),
            "first_wave" | "first-wave" | "firstwave" => Some(Self::FirstWave),
            "recovery" => Some(Self::Recovery),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dependent variable of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Raw weekly postings count.
    Count,
    /// Natural log of the weekly postings count.
    LogCount,
}

impl Response {
    /// Column name used in summaries.
    pub fn column_name(self) -> &'static str {
        match self {
            Response::Count => "job_postings_count",
            Response::LogCount => "log_postings",
        }
    }

    /// Transform a raw postings count into this response.
    pub fn value(self, postings: f64) -> f64 {
        match self {
            Response::Count => postings,
            Response::LogCount => postings.ln(),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Population a model is estimated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelScope {
    /// The aggregate table.
    WholeMarket,
    /// Rows of the industry table with this `group_name`.
    Industry(String),
}

impl ModelScope {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            ModelScope::WholeMarket => "Whole labour market",
            ModelScope::Industry(name) => name,
        }
    }
}

impl fmt::Display for ModelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `1` when the week falls on or after the first post-outbreak week.
pub fn after_indicator(week: u32) -> u8 {
    u8::from(week >= crate::study::AFTER_FIRST_WEEK)
}

/// `1` for the treatment year.
pub fn treatment_indicator(year: i32) -> u8 {
    u8::from(year == TREATMENT_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds() {
        assert!(AnalysisWindow::Overall.contains(2));
        assert!(AnalysisWindow::Overall.contains(48));
        assert!(!AnalysisWindow::Overall.contains(49));
        assert!(AnalysisWindow::FirstWave.contains(30));
        assert!(!AnalysisWindow::FirstWave.contains(31));
        assert!(!AnalysisWindow::Recovery.contains(29));
        assert!(AnalysisWindow::Recovery.contains(30));
        assert!(AnalysisWindow::Recovery.contains(48));
        assert!(!AnalysisWindow::Recovery.contains(49));
    }

    #[test]
    fn first_wave_is_inside_overall() {
        for week in 1..=53 {
            if AnalysisWindow::FirstWave.contains(week) {
                assert!(AnalysisWindow::Overall.contains(week), "week {week}");
            }
        }
    }

    #[test]
    fn only_recovery_drops_panel_effects() {
        assert!(AnalysisWindow::Overall.uses_panel_effects());
        assert!(AnalysisWindow::FirstWave.uses_panel_effects());
        assert!(!AnalysisWindow::Recovery.uses_panel_effects());
    }

    #[test]
    fn indicators() {
        assert_eq!(after_indicator(10), 0);
        assert_eq!(after_indicator(11), 1);
        assert_eq!(treatment_indicator(2019), 0);
        assert_eq!(treatment_indicator(2020), 1);
    }

    #[test]
    fn window_parse_roundtrip() {
        for w in AnalysisWindow::ALL {
            let name = serde_json::to_value(w).unwrap();
            assert_eq!(AnalysisWindow::parse(name.as_str().unwrap()), Some(w));
        }
        assert_eq!(AnalysisWindow::parse("bogus"), None);
    }

    #[test]
    fn log_response() {
        assert!((Response::LogCount.value(std::f64::consts::E) - 1.0).abs() < 1e-12);
        assert_eq!(Response::Count.value(42.0), 42.0);
    }
}
