//! Cubic B-spline interpolation for smoothing weekly series.
//!
//! The interpolant uses the not-a-knot end condition: the knot vector is the
//! first abscissa repeated four times, the interior abscissae `x[2..n-2]`, and
//! the last abscissa repeated four times. Coefficients solve the square
//! collocation system `B(x) c = y`, so the curve passes through every data
//! point and reproduces cubic polynomials exactly.
//!
//! Basis functions use the Cox–de Boor recurrence (Piegl & Tiller,
//! *The NURBS Book*, A2.1/A2.2).

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use jv_core::study::SPLINE_DEGREE;
use jv_core::{Error, Result};

const K: usize = SPLINE_DEGREE;

/// A fitted cubic B-spline.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    knots: Vec<f64>,
    coefs: Vec<f64>,
}

impl CubicSpline {
    /// Interpolate `(x, y)`; `x` must be strictly increasing with at least four points.
    pub fn interpolate(x: &[f64], y: &[f64]) -> Result<Self> {
        let n = x.len();
        if y.len() != n {
            return Err(Error::Validation(format!("{n} abscissae but {} ordinates", y.len())));
        }
        if n < K + 1 {
            return Err(Error::Validation(format!(
                "cubic spline needs at least {} points, got {n}",
                K + 1
            )));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(Error::Validation("spline input contains non-finite values".into()));
        }
        if let Some(w) = x.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::Validation(format!(
                "spline abscissae must be strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }

        let mut knots = Vec::with_capacity(n + K + 1);
        knots.extend([x[0]; K + 1]);
        knots.extend_from_slice(&x[2..n - 2]);
        knots.extend([x[n - 1]; K + 1]);

        let mut a = DMatrix::zeros(n, n);
        for (i, &xi) in x.iter().enumerate() {
            let span = find_span(&knots, n, xi);
            for (r, b) in basis_funs(&knots, span, xi).into_iter().enumerate() {
                a[(i, span - K + r)] = b;
            }
        }
        let coefs = a
            .lu()
            .solve(&DVector::from_column_slice(y))
            .ok_or_else(|| Error::Computation("spline collocation matrix is singular".into()))?;

        Ok(Self { knots, coefs: coefs.iter().copied().collect() })
    }

    /// Evaluate at `x`. Points outside the data range extrapolate the end pieces.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.coefs.len();
        let span = find_span(&self.knots, n, x);
        basis_funs(&self.knots, span, x)
            .iter()
            .enumerate()
            .map(|(r, b)| b * self.coefs[span - K + r])
            .sum()
    }

    /// Knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// B-spline coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefs
    }
}

/// Index `l` with `knots[l] <= x < knots[l+1]`, clamped to `[K, n-1]`.
fn find_span(knots: &[f64], n: usize, x: f64) -> usize {
    if x >= knots[n] {
        return n - 1;
    }
    if x <= knots[K] {
        return K;
    }
    let (mut lo, mut hi) = (K, n);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if x < knots[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

/// The `K + 1` non-zero basis functions on `span`.
fn basis_funs(knots: &[f64], span: usize, x: f64) -> [f64; K + 1] {
    let mut out = [0.0; K + 1];
    let mut left = [0.0; K + 1];
    let mut right = [0.0; K + 1];
    out[0] = 1.0;
    for j in 1..=K {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = out[r] / (right[r + 1] + left[j - r]);
            out[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        out[j] = saved;
    }
    out
}

/// `num` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| if i == num - 1 { stop } else { start + step * i as f64 }).collect()
        }
    }
}

/// A smoothed curve ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothCurve {
    /// Evaluation points.
    pub x: Vec<f64>,
    /// Spline values.
    pub y: Vec<f64>,
}

impl SmoothCurve {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Interpolate a series and evaluate it at `points` spaced over `[min x, max x]`.
///
/// `label` names the series in error messages.
pub fn smooth_series(label: &str, x: &[f64], y: &[f64], points: usize) -> Result<SmoothCurve> {
    let spline = CubicSpline::interpolate(x, y).map_err(|e| match e {
        Error::Validation(msg) => Error::Validation(format!("{label}: {msg}")),
        Error::Computation(msg) => Error::Computation(format!("{label}: {msg}")),
        other => other,
    })?;
    let (lo, hi) = (x[0], x[x.len() - 1]);
    let xs = linspace(lo, hi, points);
    let ys = xs.iter().map(|&v| spline.eval(v)).collect();
    Ok(SmoothCurve { x: xs, y: ys })
}
