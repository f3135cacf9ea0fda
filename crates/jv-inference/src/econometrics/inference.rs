//! Reference distributions for Wald statistics.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use jv_core::{Error, Result};

/// Distribution a coefficient's t/z statistic is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reference {
    /// Standard normal (large-sample inference).
    Normal,
    /// Student's t with `df` degrees of freedom.
    StudentT {
        /// Degrees of freedom.
        df: f64,
    },
}

impl Reference {
    /// Two-sided p-value of `stat`.
    pub fn two_sided_p(self, stat: f64) -> Result<f64> {
        if stat.is_nan() {
            return Ok(f64::NAN);
        }
        let tail = match self {
            Reference::Normal => std_normal()?.sf(stat.abs()),
            Reference::StudentT { df } => t_dist(df)?.sf(stat.abs()),
        };
        Ok((2.0 * tail).min(1.0))
    }

    /// Two-sided critical value at confidence `level` (e.g. 0.95).
    pub fn critical(self, level: f64) -> Result<f64> {
        let q = 0.5 + level / 2.0;
        Ok(match self {
            Reference::Normal => std_normal()?.inverse_cdf(q),
            Reference::StudentT { df } => t_dist(df)?.inverse_cdf(q),
        })
    }

    /// Column header used in summaries.
    pub fn stat_label(self) -> &'static str {
        match self {
            Reference::Normal => "z",
            Reference::StudentT { .. } => "t",
        }
    }
}

/// Upper-tail p-value of an F statistic.
pub fn f_p_value(stat: f64, df_num: f64, df_den: f64) -> Result<f64> {
    if !stat.is_finite() {
        return Ok(if stat.is_nan() { f64::NAN } else { 0.0 });
    }
    let f = FisherSnedecor::new(df_num, df_den).map_err(|e| {
        Error::Computation(format!("invalid F({df_num}, {df_den}) distribution: {e}"))
    })?;
    Ok(f.sf(stat))
}

fn std_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::Computation(format!("normal distribution: {e}")))
}

fn t_dist(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Computation(format!("invalid t distribution with df={df}: {e}")))
}
