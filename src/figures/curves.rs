use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{column_series, load, render, ColumnCurve, ESTIMATE_ALPHA, REFERENCE_ALPHA, REFERENCE_COLOR};
use crate::data::Table;
use crate::error::DataError;
use crate::render::{Canvas, Figure, LineStyle};

/// An exact curve and its closed-form approximations over a shared axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvesJob {
    pub file: PathBuf,
    pub x: String,
    pub reference: ColumnCurve,
    pub curves: Vec<ColumnCurve>,
    pub x_label: String,
    pub y_label: String,
    pub output: PathBuf,
    pub canvas: Canvas,
}

impl Default for CurvesJob {
    fn default() -> Self {
        CurvesJob {
            file: PathBuf::from("data.parquet"),
            x: "x".to_string(),
            reference: ColumnCurve::new("harmonic", "q_true(T/2)", LineStyle::Solid),
            curves: vec![
                ColumnCurve::new("pade", "q_pade(T/2)", LineStyle::Dashed),
                ColumnCurve::new("taylor", "q_taylor(T/2)", LineStyle::DashDot),
                ColumnCurve::new("one", "q_1", LineStyle::Dotted),
            ],
            x_label: "ωT".to_string(),
            y_label: "q".to_string(),
            output: PathBuf::from("plot.png"),
            canvas: Canvas::default(),
        }
    }
}

impl CurvesJob {
    pub fn figure(&self, table: &Table) -> Result<Figure, DataError> {
        let mut figure = Figure::new(self.x_label.as_str(), self.y_label.as_str());
        figure.tight = true;
        figure.canvas = self.canvas;

        figure.push(
            column_series(table, &self.x, &self.reference)?
                .color(REFERENCE_COLOR)
                .alpha(REFERENCE_ALPHA),
        );
        for curve in &self.curves {
            figure.push(column_series(table, &self.x, curve)?.alpha(ESTIMATE_ALPHA));
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

    #[test]
    fn reference_first_then_approximations() {
        let x = vec![0.5, 1.0, 1.5];
        let table = Table::from_columns([
            Column::new("x", x.clone()),
            Column::new("harmonic", x.iter().map(|v| 1.0 / (v / 2.0f64).cos()).collect()),
            Column::new("pade", vec![1.03, 1.13, 1.33]),
            Column::new("taylor", vec![1.03, 1.125, 1.28]),
            Column::new("one", vec![1.03, 1.13, 1.32]),
        ]);
        let figure = CurvesJob::default().figure(&table).unwrap();

        let labels: Vec<&str> = figure.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["q_true(T/2)", "q_pade(T/2)", "q_taylor(T/2)", "q_1"]);
        assert_eq!(figure.series[0].alpha, REFERENCE_ALPHA);
        assert_eq!(figure.series[2].style, LineStyle::DashDot);
        assert_eq!(figure.series[3].points[2], (1.5, 1.32));
    }

    #[test]
    fn missing_curve_column() {
        let table = Table::from_columns([
            Column::new("x", vec![0.0]),
            Column::new("harmonic", vec![1.0]),
        ]);
        assert!(matches!(
            CurvesJob::default().figure(&table),
            Err(DataError::MissingColumn(c)) if c == "pade"
        ));
    }
}
