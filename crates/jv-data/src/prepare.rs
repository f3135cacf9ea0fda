//! Row filtering, window selection and indicator derivation.

use serde::{Deserialize, Serialize};

use jv_core::study::is_full_week;
use jv_core::types::{after_indicator, treatment_indicator};
use jv_core::{AnalysisWindow, Error, IndustryRecord, Response, Result, WeeklyObservation};

/// Remove the partial weeks (1 and 52).
pub fn drop_partial_weeks<T: WeeklyObservation>(rows: Vec<T>) -> Vec<T> {
    let before = rows.len();
    let kept: Vec<T> = rows.into_iter().filter(|r| is_full_week(r.week())).collect();
    log::debug!("partial-week filter kept {} of {before} rows", kept.len());
    kept
}

/// Rows whose week falls inside `window`.
pub fn select_window<T: WeeklyObservation>(rows: &[T], window: AnalysisWindow) -> Vec<&T> {
    rows.iter().filter(|r| window.contains(r.week())).collect()
}

/// Rows of one industry. An industry with no rows is an error.
pub fn industry_rows<'a>(
    rows: &'a [IndustryRecord],
    industry: &str,
) -> Result<Vec<&'a IndustryRecord>> {
    let out: Vec<&IndustryRecord> = rows.iter().filter(|r| r.group_name == industry).collect();
    if out.is_empty() {
        return Err(Error::Validation(format!("industry '{industry}' has no rows")));
    }
    Ok(out)
}

/// One regression row: panel keys, the two indicators and the response value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// Entity key.
    pub year: i32,
    /// Time key.
    pub week: u32,
    /// `1` when week ≥ 11.
    pub after: u8,
    /// `1` when year is 2020.
    pub y2020: u8,
    /// Dependent variable.
    pub response: f64,
}

impl IndicatorRow {
    /// The `after × y2020` interaction.
    pub fn after_y2020(&self) -> f64 {
        f64::from(self.after * self.y2020)
    }
}

/// Derived regression table for one window and response.
pub fn indicator_rows<T: WeeklyObservation>(
    rows: &[T],
    window: AnalysisWindow,
    response: Response,
) -> Result<Vec<IndicatorRow>> {
    select_window(rows, window)
        .into_iter()
        .map(|r| {
            let value = response.value(r.postings());
            if !value.is_finite() {
                return Err(Error::Validation(format!(
                    "{response} is not finite for year {} week {} (postings = {})",
                    r.year(),
                    r.week(),
                    r.postings()
                )));
            }
            Ok(IndicatorRow {
                year: r.year(),
                week: r.week(),
                after: after_indicator(r.week()),
                y2020: treatment_indicator(r.year()),
                response: value,
            })
        })
        .collect()
}

/// `(weeks, values)` of one year, sorted by week.
pub fn year_series<T: WeeklyObservation>(
    rows: &[T],
    year: i32,
    response: Response,
) -> (Vec<f64>, Vec<f64>) {
    let mut pts: Vec<(u32, f64)> = rows
        .iter()
        .filter(|r| r.year() == year)
        .map(|r| (r.week(), response.value(r.postings())))
        .collect();
    pts.sort_by_key(|&(w, _)| w);
    pts.into_iter().map(|(w, v)| (f64::from(w), v)).unzip()
}

/// Distinct years present, ascending.
pub fn years_present<T: WeeklyObservation>(rows: &[T]) -> Vec<i32> {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use jv_core::VacancyRecord;

    fn grid() -> Vec<VacancyRecord> {
        let mut rows = Vec::new();
        for year in [2018, 2019, 2020] {
            for week in 1..=52 {
                rows.push(VacancyRecord {
                    year,
                    week,
                    job_postings_count: 1000.0 + week as f64,
                });
            }
        }
        rows
    }

    #[test]
    fn partial_weeks_never_survive() {
        let rows = drop_partial_weeks(grid());
        assert_eq!(rows.len(), 3 * 50);
        assert!(rows.iter().all(|r| r.week != 1 && r.week != 52));
    }

    #[test]
    fn windows_partition_weeks() {
        let rows = drop_partial_weeks(grid());
        let overall = select_window(&rows, AnalysisWindow::Overall);
        let first = select_window(&rows, AnalysisWindow::FirstWave);
        let recovery = select_window(&rows, AnalysisWindow::Recovery);
        assert!(overall.iter().all(|r| r.week <= 48));
        assert!(first.iter().all(|r| r.week <= 30));
        assert!(recovery.iter().all(|r| (30..=48).contains(&r.week)));
        assert_eq!(overall.len(), 3 * 47);
        assert_eq!(first.len(), 3 * 29);
        assert_eq!(recovery.len(), 3 * 19);
    }

    #[test]
    fn indicators_follow_week_and_year() {
        let rows = drop_partial_weeks(grid());
        let table = indicator_rows(&rows, AnalysisWindow::Overall, Response::LogCount).unwrap();
        for r in &table {
            assert_eq!(r.after == 1, r.week >= 11);
            assert_eq!(r.y2020 == 1, r.year == 2020);
            assert_eq!(r.after_y2020() == 1.0, r.week >= 11 && r.year == 2020);
            assert!((r.response - (1000.0 + r.week as f64).ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn log_of_zero_is_rejected() {
        let rows = vec![VacancyRecord { year: 2020, week: 5, job_postings_count: 0.0 }];
        assert!(indicator_rows(&rows, AnalysisWindow::Overall, Response::LogCount).is_err());
        assert!(indicator_rows(&rows, AnalysisWindow::Overall, Response::Count).is_ok());
    }

    #[test]
    fn year_series_is_sorted() {
        let rows = vec![
            VacancyRecord { year: 2020, week: 9, job_postings_count: 3.0 },
            VacancyRecord { year: 2019, week: 2, job_postings_count: 9.0 },
            VacancyRecord { year: 2020, week: 4, job_postings_count: 1.0 },
        ];
        let (x, y) = year_series(&rows, 2020, Response::Count);
        assert_eq!(x, [4.0, 9.0]);
        assert_eq!(y, [1.0, 3.0]);
        assert_eq!(years_present(&rows), [2019, 2020]);
    }

    #[test]
    fn missing_industry() {
        let rows = vec![IndustryRecord {
            year: 2020,
            week: 3,
            group_name: "Education".into(),
            job_postings_count: 5.0,
        }];
        assert_eq!(industry_rows(&rows, "Education").unwrap().len(), 1);
        assert!(industry_rows(&rows, "Mining & quarrying").is_err());
    }
}
