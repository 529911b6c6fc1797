/// Least-squares polynomial trend over the monthly totals.
///
/// The fit solves the Vandermonde least-squares problem with Householder QR
/// after scaling each column to unit norm, which keeps the degree-2 fit
/// over month indices and six-figure totals well conditioned. Coefficients
/// are stored highest power first.

use serde::{Deserialize, Serialize};

use crate::logging::{self, Stage};
use crate::model::{DashboardError, MonthlySummary, MonthlyTrendPoint};

/// Diagonal entries of R below this (on unit-norm columns) are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Axis selection
// ---------------------------------------------------------------------------

/// Which x-position each monthly row gets in the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendAxis {
    /// Raw month number 1–12; the same month in both years shares an x.
    #[default]
    MonthOfYear,
    /// 1-based chronological position across the whole series (1–24).
    Continuous,
}

// ---------------------------------------------------------------------------
// Polynomial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polynomial {
    /// Highest power first: `[a, b, c]` is `a*x^2 + b*x + c`.
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

fn distinct_count(xs: &[f64]) -> usize {
    let mut sorted: Vec<f64> = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}

/// Fits a polynomial of `degree` to `points` by least squares.
///
/// Fails with `InsufficientData` when fewer than `degree + 1` distinct
/// x-values are present or the system is numerically rank deficient.
pub fn fit_polynomial(points: &[(f64, f64)], degree: usize) -> Result<Polynomial, DashboardError> {
    let required = degree + 1;
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let distinct_x = distinct_count(&xs);
    if distinct_x < required {
        return Err(DashboardError::InsufficientData { distinct_x, required });
    }

    let m = points.len();
    let p = required;

    // Vandermonde matrix, highest power in column 0.
    let mut a: Vec<Vec<f64>> = points
        .iter()
        .map(|&(x, _)| (0..p).map(|j| x.powi((degree - j) as i32)).collect())
        .collect();
    let mut b: Vec<f64> = points.iter().map(|p| p.1).collect();

    let mut scale = vec![0.0; p];
    for (j, s) in scale.iter_mut().enumerate() {
        *s = a.iter().map(|row| row[j] * row[j]).sum::<f64>().sqrt();
        if *s == 0.0 {
            return Err(DashboardError::InsufficientData { distinct_x, required });
        }
    }
    for row in a.iter_mut() {
        for (value, s) in row.iter_mut().zip(&scale) {
            *value /= s;
        }
    }

    // Householder triangularisation, applying each reflection to b as well.
    for k in 0..p {
        let norm = (k..m).map(|i| a[i][k] * a[i][k]).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(DashboardError::InsufficientData { distinct_x, required });
        }
        let alpha = if a[k][k] > 0.0 { -norm } else { norm };
        let mut v: Vec<f64> = (k..m).map(|i| a[i][k]).collect();
        v[0] -= alpha;
        let v_norm2: f64 = v.iter().map(|x| x * x).sum();
        if v_norm2 == 0.0 {
            continue;
        }

        for j in k..p {
            let dot: f64 = (k..m).map(|i| v[i - k] * a[i][j]).sum();
            let factor = 2.0 * dot / v_norm2;
            for i in k..m {
                a[i][j] -= factor * v[i - k];
            }
        }
        let dot: f64 = (k..m).map(|i| v[i - k] * b[i]).sum();
        let factor = 2.0 * dot / v_norm2;
        for i in k..m {
            b[i] -= factor * v[i - k];
        }
    }

    // Back substitution on R c = Q^T b.
    let mut coefficients = vec![0.0; p];
    for k in (0..p).rev() {
        if a[k][k].abs() < RANK_TOLERANCE {
            return Err(DashboardError::InsufficientData { distinct_x, required });
        }
        let tail: f64 = (k + 1..p).map(|j| a[k][j] * coefficients[j]).sum();
        coefficients[k] = (b[k] - tail) / a[k][k];
    }
    for (c, s) in coefficients.iter_mut().zip(&scale) {
        *c /= s;
    }

    Ok(Polynomial::new(coefficients))
}

/// The monthly series with its fitted curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub axis: TrendAxis,
    pub polynomial: Polynomial,
    pub points: Vec<MonthlyTrendPoint>,
}

/// Fits the trend to chronologically ordered monthly totals and evaluates
/// it at every row's x-position.
pub fn fit_monthly_trend(
    monthly: &[MonthlySummary],
    axis: TrendAxis,
    degree: usize,
) -> Result<MonthlyTrend, DashboardError> {
    let xs: Vec<f64> = monthly
        .iter()
        .enumerate()
        .map(|(position, m)| match axis {
            TrendAxis::MonthOfYear => m.month as f64,
            TrendAxis::Continuous => (position + 1) as f64,
        })
        .collect();
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(monthly)
        .map(|(&x, m)| (x, m.total as f64))
        .collect();

    let polynomial = match fit_polynomial(&pairs, degree) {
        Ok(poly) => poly,
        Err(e) => {
            logging::error(Stage::Fitter, None, &e.to_string());
            return Err(e);
        }
    };

    logging::debug(
        Stage::Fitter,
        None,
        &format!(
            "Fitted degree-{} trend over {} months ({:?} axis): {:?}",
            degree,
            monthly.len(),
            axis,
            polynomial.coefficients()
        ),
    );

    let points = monthly
        .iter()
        .zip(&xs)
        .map(|(summary, &x)| MonthlyTrendPoint {
            summary: *summary,
            x,
            fitted_value: polynomial.evaluate(x),
        })
        .collect();

    Ok(MonthlyTrend { axis, polynomial, points })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
