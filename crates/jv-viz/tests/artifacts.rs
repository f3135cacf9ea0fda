//! Artifacts built from synthetic tables.

use approx::assert_abs_diff_eq;
use jv_core::study::{INDUSTRIES, WHOLE_MARKET_LABEL};
use jv_core::{IndustryRecord, VacancyRecord};
use jv_inference::{CovarianceType, run_models};
use jv_viz::{IndustryGridArtifact, ResultsBarArtifact, WeeklyChartArtifact};

fn level(year: i32, week: u32, drop: f64, seed: u32) -> f64 {
    let wiggle = 0.002 * (((week * 29 + year as u32 * 3 + seed * 5) % 13) as f64 - 6.0);
    let shift = if year == 2020 && week >= 11 { drop } else { 0.0 };
    (7.0 + 0.2 * (week as f64 / 8.0).sin() + 0.01 * (year - 2018) as f64 + wiggle + shift).exp()
}

fn tables() -> (Vec<VacancyRecord>, Vec<IndustryRecord>) {
    let mut totals = Vec::new();
    let mut industries = Vec::new();
    for year in [2018, 2019, 2020] {
        for week in 1..=52u32 {
            let job_postings_count = level(year, week, -0.35, 0);
            totals.push(VacancyRecord { year, week, job_postings_count });
            for (i, name) in INDUSTRIES.iter().enumerate() {
                // Human health & social work: no effect at all.
                let drop = if i == 2 { 0.0 } else { -0.3 };
                industries.push(IndustryRecord {
                    year,
                    week,
                    group_name: name.to_string(),
                    job_postings_count: level(year, week, drop, i as u32 + 1),
                });
            }
        }
    }
    (totals, industries)
}

#[test]
fn figure2_grid_has_eighteen_titled_panels() {
    let (_, industries) = tables();
    let grid = IndustryGridArtifact::from_rows(&industries).unwrap();
    assert_eq!(grid.panels.len(), 18);
    assert_eq!(grid.panel(0, 0).unwrap().title.as_deref(), Some(INDUSTRIES[0]));
    assert_eq!(grid.panel(5, 2).unwrap().title.as_deref(), Some(INDUSTRIES[17]));
    assert!(grid.panel(6, 0).is_none());
    let panel = grid.panel(1, 1).unwrap();
    assert_eq!(panel.y_label, "Log of vacancies per week");
    let first = level(2018, 2, -0.3, 5).ln();
    assert_abs_diff_eq!(panel.curve(2018).unwrap().y[0], first, epsilon = 1e-9);
}

#[test]
fn figure1_smooths_counts() {
    let (totals, _) = tables();
    let chart = WeeklyChartArtifact::totals(&totals).unwrap();
    let c = chart.curve(2020).unwrap();
    assert_eq!(c.y.len(), 300);
    assert_abs_diff_eq!(c.y[299], level(2020, 51, -0.35, 0), epsilon = 1e-6);
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["markers"][0]["label"], "First death");
    assert_eq!(json["curves"][2]["color"], "#D81B60");
}

#[test]
fn figure3_from_model_run() {
    let (totals, industries) = tables();
    let results = run_models(&totals, &industries, CovarianceType::Unadjusted).unwrap();
    let bars = ResultsBarArtifact::computed(&results).unwrap();
    assert_eq!(bars.labels.len(), 19);
    assert_eq!(bars.labels[18], WHOLE_MARKET_LABEL);

    let overall = &bars.series[2];
    let expected = 100.0 * ((-0.35f64).exp() - 1.0);
    assert_abs_diff_eq!(overall.values[18], expected, epsilon = 0.5);

    // Human health & social work is row 3 in table order, 15 after reversal.
    assert!(bars.labels[15].starts_with("Human health & social work activities"));
    assert_abs_diff_eq!(overall.values[15], 0.0, epsilon = 1.0);

    // Every industry with a real drop is significant in every window.
    for (row, label) in bars.labels.iter().enumerate().filter(|&(row, _)| row != 15) {
        assert!(!label.contains('*'), "row {row}: {label}");
    }
}
