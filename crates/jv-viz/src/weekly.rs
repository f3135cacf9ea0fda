//! Figure 1 and the per-industry weekly panels: one smoothed curve per year.

use serde::{Deserialize, Serialize};

use jv_core::study::SMOOTH_POINTS;
use jv_core::{IndustryRecord, Response, Result, VacancyRecord, WeeklyObservation};
use jv_data::{drop_partial_weeks, industry_rows, year_series};
use jv_inference::smooth_series;

use crate::markers::{EventMarker, YEAR_STYLES, event_markers};

/// One smoothed year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCurve {
    /// Calendar year.
    pub year: i32,
    /// Legend label.
    pub label: String,
    /// Line colour.
    pub color: String,
    /// Line width in points.
    pub line_width: f64,
    /// Evaluation weeks.
    pub x: Vec<f64>,
    /// Smoothed values.
    pub y: Vec<f64>,
}

/// Weekly vacancies chart: one smoothed curve per comparison year plus the
/// event markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChartArtifact {
    /// Panel title (industry name), if any.
    pub title: Option<String>,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Curves, oldest year first.
    pub curves: Vec<YearCurve>,
    /// Vertical event lines.
    pub markers: Vec<EventMarker>,
}

impl WeeklyChartArtifact {
    /// Smooth every comparison year of `rows` (weeks 1 and 52 are dropped first).
    ///
    /// `series` names the data in error messages.
    pub fn build<T: WeeklyObservation + Clone>(
        series: &str,
        rows: &[T],
        response: Response,
        x_label: &str,
        y_label: &str,
    ) -> Result<Self> {
        let rows = drop_partial_weeks(rows.to_vec());
        let mut curves = Vec::with_capacity(YEAR_STYLES.len());
        for style in YEAR_STYLES {
            let (x, y) = year_series(&rows, style.year, response);
            let curve = smooth_series(&format!("{series} {}", style.year), &x, &y, SMOOTH_POINTS)?;
            curves.push(YearCurve {
                year: style.year,
                label: style.year.to_string(),
                color: style.color.to_string(),
                line_width: style.line_width,
                x: curve.x,
                y: curve.y,
            });
        }
        Ok(Self {
            title: None,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            curves,
            markers: event_markers(),
        })
    }

    /// Figure 1: aggregate postings counts.
    pub fn totals(rows: &[VacancyRecord]) -> Result<Self> {
        Self::build(
            "whole labour market",
            rows,
            Response::Count,
            "Weeks of the year",
            "Vacancies per week",
        )
    }

    /// One Figure 2 panel: log postings of `industry`.
    pub fn industry(rows: &[IndustryRecord], industry: &str) -> Result<Self> {
        let subset = industry_rows(rows, industry)?;
        let mut chart = Self::build(
            industry,
            &subset,
            Response::LogCount,
            "Week of the year",
            "Log of vacancies per week",
        )?;
        chart.title = Some(industry.to_string());
        Ok(chart)
    }

    /// Curve of `year`, if present.
    pub fn curve(&self, year: i32) -> Option<&YearCurve> {
        self.curves.iter().find(|c| c.year == year)
    }

    /// Legend entries `(label, colour, width)`: curves first, then markers.
    pub fn legend_entries(&self) -> Vec<(String, String, f64)> {
        self.curves
            .iter()
            .map(|c| (c.label.clone(), c.color.clone(), c.line_width))
            .chain(self.markers.iter().map(|m| (m.label.clone(), m.color.clone(), m.line_width)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<VacancyRecord> {
        let mut out = Vec::new();
        for year in [2018, 2019, 2020] {
            for week in 1..=52 {
                out.push(VacancyRecord {
                    year,
                    week,
                    job_postings_count: 50_000.0 + 1_000.0 * (week as f64 / 7.0).sin(),
                });
            }
        }
        out
    }

    #[test]
    fn totals_chart_has_three_smoothed_years() {
        let chart = WeeklyChartArtifact::totals(&rows()).unwrap();
        assert_eq!(chart.curves.len(), 3);
        for c in &chart.curves {
            assert_eq!(c.x.len(), 300);
            assert_eq!(c.y.len(), 300);
            assert_eq!(c.x[0], 2.0);
            assert_eq!(c.x[299], 51.0);
        }
        assert_eq!(chart.curve(2020).unwrap().line_width, 2.0);
        assert_eq!(chart.legend_entries().len(), 7);
        assert!(chart.title.is_none());
    }

    #[test]
    fn short_year_fails_with_its_name() {
        let rows: Vec<VacancyRecord> =
            rows().into_iter().filter(|r| r.year != 2019 || r.week < 5).collect();
        let err = WeeklyChartArtifact::totals(&rows).unwrap_err().to_string();
        assert!(err.contains("2019"), "{err}");
    }
}
