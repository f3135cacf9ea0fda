//! Model runner on a synthetic aggregate and industry panel.

use approx::assert_abs_diff_eq;
use jv_core::study::INDUSTRIES;
use jv_core::{AnalysisWindow, IndustryRecord, ModelScope, Response, VacancyRecord};
use jv_inference::{CovarianceType, render_report, run_models};

/// Per-industry 2020 drop in log points, distinct for every industry.
fn industry_drop(i: usize) -> f64 {
    -0.05 * (i as f64 + 1.0) / 2.0
}

fn log_level(year: i32, week: u32, drop: f64, seed: u32) -> f64 {
    let treated = year == 2020 && week >= 11;
    let wiggle = 0.001 * (((week * 31 + year as u32 * 17 + seed * 7) % 11) as f64 - 5.0);
    8.0 + 0.02 * (year - 2018) as f64 + 0.1 * (week as f64 / 6.0).cos() + wiggle
        + if treated { drop } else { 0.0 }
}

fn synthetic() -> (Vec<VacancyRecord>, Vec<IndustryRecord>) {
    let mut totals = Vec::new();
    let mut industries = Vec::new();
    for year in [2018, 2019, 2020] {
        for week in 1..=52u32 {
            totals.push(VacancyRecord {
                year,
                week,
                job_postings_count: log_level(year, week, -0.3, 0).exp(),
            });
            for (i, name) in INDUSTRIES.iter().enumerate() {
                industries.push(IndustryRecord {
                    year,
                    week,
                    group_name: name.to_string(),
                    job_postings_count: log_level(year, week, industry_drop(i), i as u32 + 1)
                        .exp(),
                });
            }
        }
    }
    (totals, industries)
}

#[test]
fn full_model_set() {
    let (totals, industries) = synthetic();
    let results = run_models(&totals, &industries, CovarianceType::Unadjusted).unwrap();
    assert_eq!(results.fits.len(), 6 + 3 * INDUSTRIES.len());

    let overall =
        results.get(&ModelScope::WholeMarket, AnalysisWindow::Overall, Response::LogCount).unwrap();
    assert_abs_diff_eq!(overall.treatment().unwrap().estimate, -0.3, epsilon = 0.005);
    assert!(overall.treatment().unwrap().p_value < 0.001);

    for (i, name) in INDUSTRIES.iter().enumerate() {
        let scope = ModelScope::Industry(name.to_string());
        let fit = results.get(&scope, AnalysisWindow::FirstWave, Response::LogCount).unwrap();
        assert_abs_diff_eq!(fit.treatment().unwrap().estimate, industry_drop(i), epsilon = 0.005);
        assert!(results.get(&scope, AnalysisWindow::Overall, Response::Count).is_err());
    }

    let report = render_report(&results);
    assert!(report.contains("PanelOLS Estimation Summary"));
    assert!(report.contains("OLS Regression Results"));
    assert!(report.contains(INDUSTRIES[17]));
}

#[test]
fn results_serialize_to_json() {
    let (totals, industries) = synthetic();
    let results = run_models(&totals, &industries, CovarianceType::Debiased).unwrap();
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json["covariance"], "debiased");
    assert_eq!(json["fits"][0]["scope"], "whole_market");
    assert_eq!(json["fits"][0]["result"]["estimator"], "panel_ols");
    assert_eq!(json["fits"][0]["result"]["reference"]["kind"], "student_t");
}
