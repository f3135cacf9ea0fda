use anyhow::{Context, Result};
use std::path::PathBuf;

use jv_inference::{CovarianceType, StudyResults, render_report, run_models};

use crate::inputs::Inputs;

pub(crate) fn parse_cov(name: &str) -> Result<CovarianceType> {
    CovarianceType::parse(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown covariance estimator '{name}' (expected unadjusted, debiased or clustered)"
        )
    })
}

/// Fit every model of the study.
pub(crate) fn fit_all(inputs: &Inputs, cov: CovarianceType) -> Result<StudyResults> {
    let results = run_models(&inputs.totals, &inputs.industries, cov)?;
    tracing::info!(fits = results.fits.len(), cov = %cov, "models fitted");
    Ok(results)
}

/// Fit, print the regression tables and optionally write the JSON results.
pub(crate) fn cmd_models(
    inputs: &Inputs,
    cov: CovarianceType,
    json: Option<&PathBuf>,
) -> Result<StudyResults> {
    let results = fit_all(inputs, cov)?;
    print!("{}", render_report(&results));
    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&results)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "model results written");
    }
    Ok(results)
}
