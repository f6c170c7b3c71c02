//! Least-squares polynomial trend fits for timing data.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::data::model::ensure_finite;
use crate::error::{DataError, Result};

/// Singular values below this (relative to the largest) are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// A polynomial with coefficients in ascending order: `c[0] + c[1] x + ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Polynomial { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate at `n` evenly spaced points over `[from, to]`.
    pub fn sample(&self, from: f64, to: f64, n: usize) -> Vec<(f64, f64)> {
        match n {
            0 => Vec::new(),
            1 => vec![(from, self.eval(from))],
            _ => {
                let step = (to - from) / (n - 1) as f64;
                (0..n)
                    .map(|k| {
                        let x = if k == n - 1 { to } else { from + step * k as f64 };
                        (x, self.eval(x))
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(power, c)| match power {
                0 => format!("{c:.6e}"),
                1 => format!("{c:.6e}·x"),
                _ => format!("{c:.6e}·x^{power}"),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}

/// Least-squares fit of a degree-`degree` polynomial through `(x, y)`.
///
/// The Vandermonde columns are normalised before the SVD solve so that
/// problem sizes in the millions stay well-conditioned. With
/// `degree >= distinct(x) - 1` the minimum-norm solution interpolates.
pub fn fit_polynomial_trend(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(DataError::length_mismatch("trend fit y", x.len(), y.len()));
    }
    if x.is_empty() {
        return Err(DataError::length_mismatch("trend fit x", 1, 0));
    }
    if degree >= x.len() {
        return Err(DataError::InvalidDegree {
            degree,
            points: x.len(),
        });
    }
    ensure_finite("x", x)?;
    ensure_finite("y", y)?;

    let n = x.len();
    let m = degree + 1;
    let mut vandermonde = DMatrix::from_fn(n, m, |row, col| x[row].powi(col as i32));

    let mut scales = vec![1.0; m];
    for (col, scale) in scales.iter_mut().enumerate() {
        let norm = vandermonde.column(col).norm();
        if norm > 0.0 {
            *scale = norm;
            vandermonde.column_mut(col).iter_mut().for_each(|v| *v /= norm);
        }
    }

    let rhs = DVector::from_column_slice(y);
    let svd = vandermonde.svd(true, true);
    let eps = RANK_TOLERANCE * svd.singular_values.max();
    let solution = svd.solve(&rhs, eps).map_err(DataError::SingularFit)?;

    let coefficients = solution
        .iter()
        .zip(&scales)
        .map(|(c, s)| c / s)
        .collect();
    Ok(Polynomial::new(coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() <= tol * (1.0 + b.abs()),
            "{a} vs {b} (tol {tol})"
        );
    }

    #[test]
    fn horner_evaluation() {
        let p = Polynomial::new(vec![1.0, -2.0, 3.0]);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.eval(0.0), 1.0);
        assert_eq!(p.eval(2.0), 9.0);
    }

    #[test]
    fn recovers_a_line() {
        let x: Vec<f64> = (1..=10).map(|i| (i as f64) * ((1u64 << 20) - 1) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.25 + 3e-7 * v).collect();
        let p = fit_polynomial_trend(&x, &y, 1).unwrap();
        assert_close(p.coefficients()[0], 0.25, 1e-6);
        assert_close(p.coefficients()[1], 3e-7, 1e-6);
    }

    #[test]
    fn full_degree_interpolates() {
        let x = [1.0, 3.0, 7.0, 15.0];
        let y = [0.02, 0.4, 3.1, 29.5];
        let p = fit_polynomial_trend(&x, &y, 3).unwrap();
        for (xi, yi) in x.iter().zip(y) {
            assert_close(p.eval(*xi), yi, 1e-8);
        }
    }

    #[test]
    fn repeated_x_still_interpolates_distinct_points() {
        // Two distinct x values, degree 1 = distinct - 1.
        let x = [2.0, 2.0, 5.0];
        let y = [4.0, 4.0, 10.0];
        let p = fit_polynomial_trend(&x, &y, 1).unwrap();
        assert_close(p.eval(2.0), 4.0, 1e-9);
        assert_close(p.eval(5.0), 10.0, 1e-9);
    }

    #[test]
    fn least_squares_of_noisy_points() {
        // Closed form: slope Sxy / Sxx = 9 / 5, intercept 3 - 1.8 * 1.5.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.5, 1.5, 4.5, 5.5];
        let p = fit_polynomial_trend(&x, &y, 1).unwrap();
        assert_close(p.coefficients()[1], 1.8, 1e-9);
        assert_close(p.coefficients()[0], 0.3, 1e-9);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            fit_polynomial_trend(&[1.0, 2.0], &[1.0], 1),
            Err(DataError::LengthMismatch { .. })
        ));
        assert!(matches!(
            fit_polynomial_trend(&[1.0, 2.0], &[1.0, 2.0], 2),
            Err(DataError::InvalidDegree { degree: 2, points: 2 })
        ));
        assert!(fit_polynomial_trend(&[], &[], 0).is_err());
    }

    #[test]
    fn rejects_non_finite_points() {
        let err = fit_polynomial_trend(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(
            matches!(err, DataError::InvalidValue { ref column, row: 1, .. } if column == "x"),
            "{err}"
        );
        let err = fit_polynomial_trend(&[1.0, 2.0, 3.0], &[1.0, 2.0, f64::INFINITY], 1).unwrap_err();
        assert!(
            matches!(err, DataError::InvalidValue { ref column, row: 2, .. } if column == "y"),
            "{err}"
        );
    }

    #[test]
    fn sample_hits_both_ends() {
        let p = Polynomial::new(vec![0.0, 1.0]);
        let pts = p.sample(1.0, 3.0, 5);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], (1.0, 1.0));
        assert_eq!(pts[4], (3.0, 3.0));
        assert_eq!(pts[2], (2.0, 2.0));
    }
}
