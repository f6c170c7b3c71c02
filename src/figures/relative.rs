use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{load, render, ColumnCurve, ESTIMATE_ALPHA};
use crate::align::{relative_error_with, ZeroPolicy};
use crate::data::Table;
use crate::error::DataError;
use crate::render::{Canvas, Figure, LineStyle, Series};

/// Relative error of estimate columns against a reference column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorJob {
    pub file: PathBuf,
    pub x: String,
    pub reference: String,
    pub estimates: Vec<ColumnCurve>,
    pub zero_policy: ZeroPolicy,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    pub output: PathBuf,
    pub canvas: Canvas,
}

impl Default for ErrorJob {
    fn default() -> Self {
        Self::node_approximations()
    }
}

impl ErrorJob {
    /// Closed-form node approximations against the exact half-period value.
    pub fn node_approximations() -> Self {
        ErrorJob {
            file: PathBuf::from("data.parquet"),
            x: "x".to_string(),
            reference: "harmonic".to_string(),
            estimates: vec![
                ColumnCurve::new("pade", "pade", LineStyle::Dashed),
                ColumnCurve::new("taylor", "taylor", LineStyle::DashDot),
                ColumnCurve::new("one", "one node", LineStyle::Dotted),
                ColumnCurve::new("three", "three nodes", LineStyle::Solid),
            ],
            zero_policy: ZeroPolicy::Fail,
            x_label: "ωT".to_string(),
            y_label: "relative error".to_string(),
            grid: true,
            output: PathBuf::from("plot_error.png"),
            canvas: Canvas::default(),
        }
    }

    /// Per-step estimate `y_hat` against `y_true`.
    pub fn estimate() -> Self {
        ErrorJob {
            file: PathBuf::from("estimate.csv"),
            x: "k".to_string(),
            reference: "y_true".to_string(),
            estimates: vec![ColumnCurve::new("y_hat", "ŷ", LineStyle::SolidWithMarkers)],
            x_label: "k".to_string(),
            output: PathBuf::from("estimate_error.png"),
            ..Self::node_approximations()
        }
    }

    pub fn figure(&self, table: &Table) -> Result<Figure, DataError> {
        let x = table.column(&self.x)?;
        let truth = table.column(&self.reference)?;
        if truth.len() != x.len() {
            return Err(DataError::LengthMismatch {
                context: format!("column '{}' against '{}'", self.reference, self.x),
                expected: x.len(),
                actual: truth.len(),
            });
        }

        let mut figure = Figure::new(self.x_label.as_str(), self.y_label.as_str());
        figure.grid = self.grid;
        figure.canvas = self.canvas;

        for curve in &self.estimates {
            let estimate = table.column(&curve.column)?;
            let error = relative_error_with(truth, estimate, self.zero_policy)?;
            figure.push(
                Series::from_axes(curve.label.as_str(), x, &error)
                    .style(curve.style)
                    .alpha(ESTIMATE_ALPHA),
            );
        }
        Ok(figure)
    }

    pub fn run(&self, base: &Path) -> Result<PathBuf> {
        let table = load(base, &self.file)?;
        let figure = self.figure(&table)?;
        render(&figure, base, &self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn estimate_table(y_true: Vec<f64>) -> Table {
        Table::from_columns([
            Column::new("k", vec![1.0, 2.0, 3.0]),
            Column::new("y_true", y_true),
            Column::new("y_hat", vec![1.0, 4.0, 10.0]),
        ])
    }

    #[test]
    fn error_series_per_estimate() {
        let figure = ErrorJob::estimate()
            .figure(&estimate_table(vec![2.0, 4.0, 8.0]))
            .unwrap();
        assert_eq!(figure.series.len(), 1);
        assert_eq!(
            figure.series[0].points,
            vec![(1.0, 0.5), (2.0, 0.0), (3.0, 0.25)]
        );
        assert!(figure.grid);
    }

    #[test]
    fn zero_reference_follows_policy() {
        let table = estimate_table(vec![2.0, 0.0, 8.0]);
        assert!(matches!(
            ErrorJob::estimate().figure(&table),
            Err(DataError::DivideByZero { index: 1 })
        ));

        let job = ErrorJob {
            zero_policy: ZeroPolicy::Nan,
            ..ErrorJob::estimate()
        };
        let figure = job.figure(&table).unwrap();
        assert_eq!(figure.series[0].finite_runs().len(), 2);
    }

    #[test]
    fn estimate_length_must_match() {
        let table = Table::from_columns([
            Column::new("k", vec![1.0, 2.0]),
            Column::new("y_true", vec![1.0, 2.0]),
            Column::new("y_hat", vec![1.0]),
        ]);
        assert!(matches!(
            ErrorJob::estimate().figure(&table),
            Err(DataError::LengthMismatch { .. })
        ));
    }
}
