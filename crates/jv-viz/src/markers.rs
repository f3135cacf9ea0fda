//! Event markers and per-year curve styles shared by the weekly charts.

use serde::{Deserialize, Serialize};

/// A dated event drawn as a vertical line on the weekly charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    /// Week of the year.
    pub week: f64,
    /// Legend label.
    pub label: String,
    /// Line colour (`#RRGGBB`).
    pub color: String,
    /// Line width in points.
    pub line_width: f64,
}

/// Pandemic events of 2020, in legend order.
pub const EVENTS: [(f64, &str, &str); 4] = [
    (10.0, "First death", "#FFC107"),
    (13.0, "First lockdown starts", "#1E88E5"),
    (30.0, "First lockdown ends", "#25D2FF"),
    (42.0, "Second lockdown starts", "#338F20"),
];

const MARKER_WIDTH: f64 = 2.0;

/// Line style of one comparison year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearStyle {
    /// Calendar year.
    pub year: i32,
    /// Line colour.
    pub color: &'static str,
    /// Line width in points.
    pub line_width: f64,
}

/// Styles of the comparison years, oldest first; 2020 is emphasised.
pub const YEAR_STYLES: [YearStyle; 3] = [
    YearStyle { year: 2018, color: "#D0C9CC", line_width: 1.5 },
    YearStyle { year: 2019, color: "#8A8285", line_width: 1.5 },
    YearStyle { year: 2020, color: "#D81B60", line_width: 2.0 },
];

/// The four event markers.
pub fn event_markers() -> Vec<EventMarker> {
    EVENTS
        .iter()
        .map(|&(week, label, color)| EventMarker {
            week,
            label: label.to_string(),
            color: color.to_string(),
            line_width: MARKER_WIDTH,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jv_core::study::COMPARISON_YEARS;

    #[test]
    fn styles_cover_comparison_years() {
        let years: Vec<i32> = YEAR_STYLES.iter().map(|s| s.year).collect();
        assert_eq!(years, COMPARISON_YEARS);
    }

    #[test]
    fn markers_in_week_order() {
        let m = event_markers();
        assert_eq!(m.len(), 4);
        assert!(m.windows(2).all(|w| w[0].week < w[1].week));
        assert!(m.iter().all(|e| e.line_width == 2.0));
    }
}
