//! Two-way fixed-effects panel regression (PanelOLS).
//!
//! Entity and time effects are absorbed with [`FixedEffectsSolver`]; the
//! grand means of the dependent variable and regressors are then added back
//! so that a constant stays identified. The slope estimates equal those of the
//! within regression, and the constant is the average fitted effect level.
//!
//! Degrees of freedom follow the usual panel convention: the effects consume
//! `absorbed − 1` parameters beyond the `k` explicit ones (the constant takes
//! the remaining one).
//!
//! # References
//!
//! - Wooldridge, *Econometric Analysis of Cross Section and Panel Data*, Ch. 10.
//! - Arellano (1987), "Computing robust standard errors for within-groups estimators."

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use jv_core::{Error, Result};

use super::hdfe::FixedEffectsSolver;
use super::inference::Reference;
use super::result::{
    CovarianceType, Estimator, FTest, RegressionResult, coefficient_table, gaussian_loglik,
};

/// Name of the constant in panel summaries.
pub const CONST_NAME: &str = "const";

/// Panel sample: keys, dependent variable and regressor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    /// Dependent variable name.
    pub dependent: String,
    /// Entity key per observation.
    pub entity: Vec<i64>,
    /// Time key per observation.
    pub time: Vec<i64>,
    /// Dependent variable.
    pub y: Vec<f64>,
    /// Regressor names (constant excluded).
    pub exog_names: Vec<String>,
    /// Regressor columns, each of length `n`.
    pub exog: Vec<Vec<f64>>,
}

impl PanelData {
    fn validate(&self) -> Result<usize> {
        let n = self.y.len();
        if n == 0 {
            return Err(Error::Validation(format!("panel for '{}' is empty", self.dependent)));
        }
        if self.entity.len() != n || self.time.len() != n {
            return Err(Error::Validation(format!(
                "panel keys have {}/{} entries, expected {n}",
                self.entity.len(),
                self.time.len()
            )));
        }
        if self.exog.is_empty() || self.exog.len() != self.exog_names.len() {
            return Err(Error::Validation(
                "panel needs at least one named regressor column".into(),
            ));
        }
        if let Some((name, col)) =
            self.exog_names.iter().zip(&self.exog).find(|(_, col)| col.len() != n)
        {
            return Err(Error::Validation(format!(
                "regressor '{name}' has {} entries, expected {n}",
                col.len()
            )));
        }
        if self.y.iter().chain(self.exog.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(Error::Validation(format!(
                "panel for '{}' contains non-finite values",
                self.dependent
            )));
        }
        Ok(n)
    }
}

/// Fit `y ~ 1 + exog + EntityEffects + TimeEffects`.
pub fn panel_ols(data: &PanelData, cov: CovarianceType) -> Result<RegressionResult> {
    let n = data.validate()?;
    let p = data.exog.len();
    let k = p + 1;

    let solver = FixedEffectsSolver::two_way(&data.entity, &data.time)?;
    let (n_entities, n_time) = (solver.levels()[0], solver.levels()[1]);

    let y_dm = solver.partial_out(&data.y)?;
    let y_bar = mean(&data.y);

    let mut x = DMatrix::from_element(n, k, 1.0);
    for (j, (name, col)) in data.exog_names.iter().zip(&data.exog).enumerate() {
        let col_dm = solver.partial_out(col)?;
        if col_dm.iter().map(|v| v * v).sum::<f64>() < 1e-12 * n as f64 {
            return Err(Error::Computation(format!(
                "regressor '{name}' is absorbed by the entity and time effects"
            )));
        }
        let bar = mean(col);
        for (i, v) in col_dm.into_iter().enumerate() {
            x[(i, j + 1)] = v + bar;
        }
    }
    let y = DVector::from_iterator(n, y_dm.iter().map(|v| v + y_bar));

    let xtx_inv = (x.transpose() * &x)
        .try_inverse()
        .ok_or_else(|| Error::Computation("X'X is singular after absorbing effects".into()))?;
    let beta = &xtx_inv * (x.transpose() * &y);
    let resid = &y - &x * &beta;
    let rss = resid.norm_squared();

    let df_absorbed = solver.degrees_of_freedom_absorbed();
    let extra_df = df_absorbed.saturating_sub(1) as f64;
    let df_resid = n as f64 - extra_df - k as f64;
    if df_resid <= 0.0 {
        return Err(Error::Computation(format!(
            "no residual degrees of freedom: {n} observations, {} effects, {k} parameters",
            df_absorbed
        )));
    }

    let (cov_matrix, reference) = match cov {
        CovarianceType::Unadjusted => {
            let s2 = rss / (n as f64 - extra_df);
            (&xtx_inv * s2, Reference::Normal)
        }
        CovarianceType::Debiased => {
            let s2 = rss / df_resid;
            (&xtx_inv * s2, Reference::StudentT { df: df_resid })
        }
        CovarianceType::Clustered => {
            (cluster_robust_cov(&x, &resid, &xtx_inv, &data.entity), Reference::Normal)
        }
    };

    let mut names = vec![CONST_NAME.to_string()];
    names.extend(data.exog_names.iter().cloned());
    let beta: Vec<f64> = beta.iter().copied().collect();
    let coefficients = coefficient_table(&names, &beta, &cov_matrix, reference)?;

    let tss_within: f64 = y_dm.iter().map(|v| v * v).sum();
    let r_squared = if tss_within > 0.0 { 1.0 - rss / tss_within } else { 0.0 };
    let f_test = Some(FTest::from_rss(tss_within, rss, p as f64, df_resid)?);

    log::debug!(
        "PanelOLS {}: n={n} entities={n_entities} periods={n_time} rss={rss:.6e}",
        data.dependent
    );

    Ok(RegressionResult {
        estimator: Estimator::PanelOls,
        dependent: data.dependent.clone(),
        covariance: cov,
        reference,
        coefficients,
        n_obs: n,
        n_entities: Some(n_entities),
        n_time_periods: Some(n_time),
        df_absorbed,
        df_resid,
        df_model: p as f64,
        r_squared,
        r_squared_adj: None,
        f_test,
        rss,
        log_likelihood: gaussian_loglik(rss, n),
    })
}

/// Liang–Zeger cluster-robust covariance.
///
/// `V = c · (X'X)⁻¹ (Σ_g X_g' e_g e_g' X_g) (X'X)⁻¹` with the small-sample
/// factor `c = G/(G−1) · (N−1)/(N−K)`.
pub fn cluster_robust_cov(
    x: &DMatrix<f64>,
    residuals: &DVector<f64>,
    xtx_inv: &DMatrix<f64>,
    cluster_ids: &[i64],
) -> DMatrix<f64> {
    let (n, p) = x.shape();

    let mut clusters: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, &cid) in cluster_ids.iter().enumerate() {
        clusters.entry(cid).or_default().push(i);
    }
    let g = clusters.len() as f64;

    let mut meat = DMatrix::zeros(p, p);
    for rows in clusters.values() {
        let mut score = DVector::zeros(p);
        for &i in rows {
            score += x.row(i).transpose() * residuals[i];
        }
        meat += &score * score.transpose();
    }

    let (n_f, p_f) = (n as f64, p as f64);
    let correction =
        if g > 1.0 && n_f > p_f { (g / (g - 1.0)) * ((n_f - 1.0) / (n_f - p_f)) } else { 1.0 };

    (xtx_inv * meat * xtx_inv) * correction
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}
