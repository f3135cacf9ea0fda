//! The full set of vacancy models: aggregate and per-industry fits for every
//! analysis window.
//!
//! Aggregate rows get both the log and the raw-count response (six fits);
//! each industry gets the log response only (fifty-four fits). Overall and
//! First-wave windows use [`panel_ols`] with year as entity and week as time;
//! the Recovery window uses [`ols_fit`] on the 2020 indicator.

use serde::{Deserialize, Serialize};

use jv_core::study::{INDUSTRIES, is_full_week};
use jv_core::{
    AnalysisWindow, Error, IndustryRecord, ModelScope, Response, Result, VacancyRecord,
    WeeklyObservation,
};
use jv_data::{IndicatorRow, indicator_rows, industry_rows};

use crate::econometrics::{
    Coefficient, CovarianceType, LinearData, PanelData, RegressionResult, ols_fit, panel_ols,
};

/// Regressor name of the panel treatment interaction.
pub const PANEL_TREATMENT: &str = "after:y2020";
/// Regressor name of the OLS treatment dummy.
pub const OLS_TREATMENT: &str = "y2020";

/// One fitted model and what it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    /// Population.
    pub scope: ModelScope,
    /// Week range.
    pub window: AnalysisWindow,
    /// Dependent variable.
    pub response: Response,
    /// Fitted model.
    pub result: RegressionResult,
}

impl ModelFit {
    /// The 2020 treatment coefficient.
    pub fn treatment(&self) -> Result<&Coefficient> {
        self.result.coefficient(treatment_name(self.window))
    }

    /// Treatment effect in percent, `100 · (exp(β) − 1)`. Log-response fits only.
    pub fn percent_effect(&self) -> Result<f64> {
        if self.response != Response::LogCount {
            return Err(Error::Validation(format!(
                "percentage effect needs a log response, '{}' {} model uses {}",
                self.scope, self.window, self.response
            )));
        }
        Ok(percent_effect(self.treatment()?.estimate))
    }
}

/// `100 · (exp(β) − 1)`.
pub fn percent_effect(beta: f64) -> f64 {
    100.0 * beta.exp_m1()
}

/// Name of the treatment regressor used in `window`.
pub fn treatment_name(window: AnalysisWindow) -> &'static str {
    if window.uses_panel_effects() { PANEL_TREATMENT } else { OLS_TREATMENT }
}

/// All fits of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResults {
    /// Covariance estimator used for the panel fits.
    pub covariance: CovarianceType,
    /// Fits in reporting order.
    pub fits: Vec<ModelFit>,
}

impl StudyResults {
    /// Look a fit up.
    pub fn get(
        &self,
        scope: &ModelScope,
        window: AnalysisWindow,
        response: Response,
    ) -> Result<&ModelFit> {
        self.fits
            .iter()
            .find(|f| &f.scope == scope && f.window == window && f.response == response)
            .ok_or_else(|| {
                Error::Validation(format!("no {response} model for '{scope}' in window {window}"))
            })
    }
}

/// Fit one window of a series. Rows in weeks 1 and 52 are ignored.
pub fn fit_window<T: WeeklyObservation>(
    rows: &[T],
    window: AnalysisWindow,
    response: Response,
    cov: CovarianceType,
) -> Result<RegressionResult> {
    let full: Vec<&T> = rows.iter().filter(|r| is_full_week(r.week())).collect();
    let table = indicator_rows(&full, window, response)?;
    if window.uses_panel_effects() {
        panel_ols(&panel_data(&table, response), cov)
    } else {
        ols_fit(&linear_data(&table, response))
    }
}

fn panel_data(rows: &[IndicatorRow], response: Response) -> PanelData {
    PanelData {
        dependent: response.column_name().to_string(),
        entity: rows.iter().map(|r| i64::from(r.year)).collect(),
        time: rows.iter().map(|r| i64::from(r.week)).collect(),
        y: rows.iter().map(|r| r.response).collect(),
        exog_names: vec![PANEL_TREATMENT.to_string()],
        exog: vec![rows.iter().map(IndicatorRow::after_y2020).collect()],
    }
}

fn linear_data(rows: &[IndicatorRow], response: Response) -> LinearData {
    LinearData {
        dependent: response.column_name().to_string(),
        y: rows.iter().map(|r| r.response).collect(),
        exog_names: vec![OLS_TREATMENT.to_string()],
        exog: vec![rows.iter().map(|r| f64::from(r.y2020)).collect()],
    }
}

/// Six aggregate fits: each window with the log and the count response.
pub fn fit_totals(rows: &[VacancyRecord], cov: CovarianceType) -> Result<Vec<ModelFit>> {
    let mut fits = Vec::with_capacity(6);
    for window in AnalysisWindow::ALL {
        for response in [Response::LogCount, Response::Count] {
            let result = fit_window(rows, window, response, cov)?;
            fits.push(ModelFit { scope: ModelScope::WholeMarket, window, response, result });
        }
    }
    Ok(fits)
}

/// Log-response fits for every industry and window, window-major.
pub fn fit_industries(rows: &[IndustryRecord], cov: CovarianceType) -> Result<Vec<ModelFit>> {
    let mut fits = Vec::with_capacity(AnalysisWindow::ALL.len() * INDUSTRIES.len());
    for window in AnalysisWindow::ALL {
        for industry in INDUSTRIES {
            let subset = industry_rows(rows, industry)?;
            let result =
                fit_window(&subset, window, Response::LogCount, cov).map_err(|e| match e {
                    Error::Validation(m) => Error::Validation(format!("{industry}: {m}")),
                    Error::Computation(m) => Error::Computation(format!("{industry}: {m}")),
                    other => other,
                })?;
            fits.push(ModelFit {
                scope: ModelScope::Industry(industry.to_string()),
                window,
                response: Response::LogCount,
                result,
            });
        }
    }
    Ok(fits)
}

/// Fit every model of the study.
pub fn run_models(
    totals: &[VacancyRecord],
    industries: &[IndustryRecord],
    cov: CovarianceType,
) -> Result<StudyResults> {
    let mut fits = fit_totals(totals, cov)?;
    log::info!("fitted {} aggregate models", fits.len());
    let by_industry = fit_industries(industries, cov)?;
    log::info!("fitted {} industry models", by_industry.len());
    fits.extend(by_industry);
    Ok(StudyResults { covariance: cov, fits })
}
