//! Plain-text regression summaries.

use std::fmt::{self, Write as _};

use crate::econometrics::{Estimator, RegressionResult};
use crate::study::{ModelFit, StudyResults};

const WIDTH: usize = 80;

fn rule(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    writeln!(f, "{}", c.to_string().repeat(WIDTH))
}

fn centered(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f, "{text:^WIDTH$}")
}

/// Format a statistic compactly: fixed point for ordinary magnitudes,
/// scientific otherwise.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let a = v.abs();
    if a != 0.0 && !(1e-4..1e7).contains(&a) { format!("{v:.3e}") } else { format!("{v:.4}") }
}

/// Two key/value columns, each 40 characters wide.
fn header_block(
    f: &mut fmt::Formatter<'_>,
    left: &[(&str, String)],
    right: &[(&str, String)],
) -> fmt::Result {
    let half = WIDTH / 2;
    for i in 0..left.len().max(right.len()) {
        let cell = |side: &[(&str, String)]| match side.get(i) {
            Some((k, v)) => format!("{:<w$}", format!("{k:<20}{v:>18}"), w = half),
            None => " ".repeat(half),
        };
        writeln!(f, "{}{}", cell(left), cell(right).trim_end())?;
    }
    Ok(())
}

impl fmt::Display for RegressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        centered(f, self.estimator.title())?;
        rule(f, '=')?;

        let mut left = vec![("Dep. Variable:", self.dependent.clone())];
        let mut right = vec![("R-squared:", num(self.r_squared))];
        match self.estimator {
            Estimator::PanelOls => {
                left.push(("Estimator:", "PanelOLS".to_string()));
                left.push(("No. Observations:", self.n_obs.to_string()));
                left.push(("Entities:", self.n_entities.unwrap_or(0).to_string()));
                left.push(("Time periods:", self.n_time_periods.unwrap_or(0).to_string()));
                left.push(("Cov. Estimator:", self.covariance.label().to_string()));
                left.push(("Absorbed DoF:", self.df_absorbed.to_string()));
                right[0].0 = "R-squared (Within):";
            }
            Estimator::Ols => {
                left.push(("Model:", "OLS".to_string()));
                left.push(("Method:", "Least Squares".to_string()));
                left.push(("No. Observations:", self.n_obs.to_string()));
                left.push(("Df Residuals:", num(self.df_resid)));
                left.push(("Df Model:", num(self.df_model)));
                left.push(("Covariance Type:", "nonrobust".to_string()));
                if let Some(adj) = self.r_squared_adj {
                    right.push(("Adj. R-squared:", num(adj)));
                }
            }
        }
        if let Some(ft) = &self.f_test {
            right.push(("F-statistic:", num(ft.stat)));
            right.push(("Prob (F-statistic):", num(ft.p_value)));
            right.push(("Distribution:", format!("F({},{})", ft.df_num, ft.df_den)));
        }
        right.push(("Log-Likelihood:", num(self.log_likelihood)));
        if self.estimator == Estimator::Ols {
            right.push(("AIC:", num(self.aic())));
            right.push(("BIC:", num(self.bic())));
        }
        header_block(f, &left, &right)?;
        rule(f, '=')?;

        let stat = self.reference.stat_label();
        writeln!(
            f,
            "{:<16}{:>11}{:>11}{:>9}{:>9}{:>12}{:>12}",
            "",
            "coef",
            "std err",
            stat,
            format!("P>|{stat}|"),
            "[0.025",
            "0.975]"
        )?;
        rule(f, '-')?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<16}{:>11}{:>11}{:>9.3}{:>9.3}{:>12}{:>12}",
                c.name,
                num(c.estimate),
                num(c.std_error),
                c.statistic,
                c.p_value,
                num(c.ci_lower),
                num(c.ci_upper)
            )?;
        }
        rule(f, '=')?;
        if self.estimator == Estimator::PanelOls {
            writeln!(f, "Included effects: Entity, Time")?;
        }
        Ok(())
    }
}

/// Section heading for one fit.
pub fn fit_heading(fit: &ModelFit) -> String {
    format!("**************** {} | {} | {}", fit.scope, fit.window, fit.response)
}

/// Every fit, each under its heading.
pub fn render_report(results: &StudyResults) -> String {
    let mut out = String::new();
    for fit in &results.fits {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "\n{}\n{}", fit_heading(fit), fit.result);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::econometrics::{LinearData, ols_fit};

    #[test]
    fn ols_summary_lists_parameters() {
        let res = ols_fit(&LinearData {
            dependent: "log_postings".into(),
            y: vec![9.0, 10.0, 11.0, 10.0, 6.0, 7.0, 8.0],
            exog_names: vec!["y2020".into()],
            exog: vec![vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]],
        })
        .unwrap();
        let text = res.to_string();
        assert!(text.contains("OLS Regression Results"));
        assert!(text.contains("Dep. Variable:"));
        assert!(text.contains("log_postings"));
        assert!(text.contains("Intercept"));
        assert!(text.contains("y2020"));
        assert!(text.contains("P>|t|"));
        assert!(text.contains("nonrobust"));
        assert!(text.lines().all(|l| l.chars().count() <= WIDTH), "{text}");
    }

    #[test]
    fn number_format() {
        assert_eq!(num(0.0), "0.0000");
        assert_eq!(num(-0.3456789), "-0.3457");
        assert_eq!(num(123456.0), "123456.0000");
        assert_eq!(num(1.5e-6), "1.500e-6");
    }
}
