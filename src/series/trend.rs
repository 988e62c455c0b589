// ============================================================
// Layer 4b — Trend Smoother
// ============================================================
// Fits a least-squares polynomial through a YearSeries and
// resamples it densely for plotting.
//
// Years are mapped affinely onto [-1, 1] before fitting:
//
//   t = (year - center) / half_span
//
// Raw years (1946..2022) raised to the 5th power are ~3e16 and
// make the Vandermonde matrix hopelessly ill-conditioned; on
// [-1, 1] every power stays bounded by 1.
//
// The system  V · c = y  (V[i][j] = t_i^j) is solved through
// the SVD of V, which gives the least-squares solution even
// when V is close to rank-deficient.
//
// Reference: nalgebra docs, linalg::SVD::solve

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::domain::series::{SmoothedCurve, YearSeries};

pub const DEFAULT_DEGREE: usize = 5;
pub const DEFAULT_SAMPLES: usize = 500;

const SINGULAR_EPS: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("need at least {needed} distinct years for the fit, found {found}")]
    InsufficientPoints { needed: usize, found: usize },

    #[error("least-squares solve failed: {0}")]
    Solve(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendSmoother {
    degree:  usize,
    samples: usize,
}

impl TrendSmoother {
    pub fn new(degree: usize, samples: usize) -> Self {
        Self { degree, samples: samples.max(2) }
    }

    pub fn fit(&self, series: &YearSeries) -> Result<SmoothedCurve, FitError> {
        let needed = self.degree + 1;
        // YearSeries years are strictly ascending, so all distinct
        if series.len() < needed {
            return Err(FitError::InsufficientPoints { needed, found: series.len() });
        }

        let years = series.years();
        let min = years[0] as f64;
        let max = years[years.len() - 1] as f64;
        let center    = (min + max) / 2.0;
        let half_span = if max > min { (max - min) / 2.0 } else { 1.0 };

        let ts: Vec<f64> = years.iter().map(|&y| (y as f64 - center) / half_span).collect();
        let vandermonde = DMatrix::from_fn(ts.len(), needed, |r, c| ts[r].powi(c as i32));
        let targets     = DVector::from_column_slice(series.values());

        let coefficients = vandermonde
            .svd(true, true)
            .solve(&targets, SINGULAR_EPS)
            .map_err(|e| FitError::Solve(e.to_string()))?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FitError::Solve("non-finite coefficients".to_string()));
        }

        let mut curve = SmoothedCurve {
            degree:       self.degree,
            coefficients: coefficients.iter().copied().collect(),
            center,
            half_span,
            xs:           Vec::with_capacity(self.samples),
            ys:           Vec::with_capacity(self.samples),
        };

        let step = (max - min) / (self.samples - 1) as f64;
        for i in 0..self.samples {
            let x = min + step * i as f64;
            curve.xs.push(x);
            curve.ys.push(curve.evaluate(x));
        }

        Ok(curve)
    }
}

impl Default for TrendSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE, DEFAULT_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i32, f64)]) -> YearSeries {
        let mut s = YearSeries::new();
        for &(y, v) in points {
            s.push(y, v);
        }
        s
    }

    #[test]
    fn test_too_few_points() {
        let s = series(&[(1946, 1.0), (1950, 2.0), (1960, 3.0)]);
        let err = TrendSmoother::default().fit(&s).unwrap_err();
        assert_eq!(err, FitError::InsufficientPoints { needed: 6, found: 3 });
    }

    #[test]
    fn test_recovers_exact_polynomial() {
        // y = 0.001 * (year - 1980)^2 is a degree-2 polynomial,
        // so the degree-5 fit must reproduce it exactly
        let f = |y: i32| 0.001 * ((y - 1980) as f64).powi(2);
        let points: Vec<(i32, f64)> = (1946..=2022).step_by(4).map(|y| (y, f(y))).collect();
        let curve = TrendSmoother::default().fit(&series(&points)).unwrap();

        for &(y, v) in &points {
            assert!((curve.evaluate(y as f64) - v).abs() < 1e-8, "year {y}");
        }
        assert!((curve.evaluate(1981.0) - f(1981)).abs() < 1e-8);
    }

    #[test]
    fn test_dense_resample_spans_year_range() {
        let points: Vec<(i32, f64)> = (1946..1956).map(|y| (y, (y % 3) as f64)).collect();
        let curve = TrendSmoother::default().fit(&series(&points)).unwrap();

        assert_eq!(curve.xs.len(), 500);
        assert_eq!(curve.ys.len(), 500);
        assert_eq!(curve.xs[0], 1946.0);
        assert!((curve.xs[499] - 1955.0).abs() < 1e-9);
        assert!(curve.xs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(curve.coefficients.len(), 6);
    }

    #[test]
    fn test_exactly_degree_plus_one_points_interpolates() {
        let points = [(1946, 1.0), (1950, -2.0), (1960, 0.5), (1970, 3.0), (1990, 0.0), (2020, 1.0)];
        let curve  = TrendSmoother::default().fit(&series(&points)).unwrap();
        for &(y, v) in &points {
            assert!((curve.evaluate(y as f64) - v).abs() < 1e-6, "year {y}");
        }
    }

    #[test]
    fn test_lower_degree() {
        let points = [(2000, 1.0), (2001, 3.0), (2002, 5.0)];
        let curve  = TrendSmoother::new(1, 3).fit(&series(&points)).unwrap();
        assert_eq!(curve.xs, vec![2000.0, 2001.0, 2002.0]);
        assert!((curve.ys[1] - 3.0).abs() < 1e-9);
    }
}
