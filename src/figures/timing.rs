use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{load, render};
use crate::data::{Table, TimingSample};
use crate::error::DataError;
use crate::fit::{fit_polynomial_trend, Polynomial};
use crate::render::{Canvas, Figure, LineStyle, Series};

const TIMING_ALPHA: f64 = 0.6;

/// Where the problem size of each timing row comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ProblemSizes {
    /// Read from a column.
    Column { name: String },
    /// Row `i` (1-based) ran with `base * i` nodes.
    Multiples { base: u64, count: usize },
}

/// Measured run times with a least-squares polynomial trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingJob {
    pub file: PathBuf,
    pub sizes: ProblemSizes,
    pub elapsed: String,
    pub degree: usize,
    pub data_label: String,
    pub fit_label: String,
    pub x_label: String,
    pub y_label: String,
    /// Points at which the fitted polynomial is drawn.
    pub trend_points: usize,
    pub output: PathBuf,
    pub canvas: Canvas,
}

impl Default for TimingJob {
    fn default() -> Self {
        TimingJob {
            file: PathBuf::from("free_body_1d_bf.csv"),
            sizes: ProblemSizes::Column {
                name: "parameter_N".to_string(),
            },
            elapsed: "mean".to_string(),
            degree: 3,
            data_label: "Brute-force m = 3".to_string(),
            fit_label: "Polyfit order = 3".to_string(),
            x_label: "N (the number of nodes)".to_string(),
            y_label: "Time (sec)".to_string(),
            trend_points: 100,
            output: PathBuf::from("free_body_1d_bf.png"),
            canvas: Canvas::default(),
        }
    }
}

impl TimingJob {
    pub fn brute_force() -> Self {
        Self::default()
    }

    pub fn divide_and_conquer() -> Self {
        TimingJob {
            file: PathBuf::from("fb_1d_dc.csv"),
            sizes: ProblemSizes::Multiples {
                base: (1 << 20) - 1,
                count: 10,
            },
            degree: 1,
            data_label: "Divide and Conquer m = 7".to_string(),
            fit_label: "Polyfit order = 1".to_string(),
            output: PathBuf::from("free_body_1d_dnc.png"),
            canvas: Canvas::new(4.0, 2.25),
            ..Self::default()
        }
    }

    pub fn samples(&self, table: &Table) -> Result<Vec<TimingSample>, DataError> {
        let sizes = match &self.sizes {
            ProblemSizes::Column { name } => table.sizes(name)?,
            ProblemSizes::Multiples { base, count } => (1..=*count as u64)
                .map(|i| {
                    base.checked_mul(i).ok_or_else(|| DataError::InvalidValue {
                        column: "problem size".to_string(),
                        row: (i - 1) as usize,
                        message: format!("{base} * {i} overflows u64"),
                    })
                })
                .collect::<Result<Vec<u64>, DataError>>()?,
        };
        let elapsed = table.exact(&self.elapsed, sizes.len())?;
        TimingSample::zip(&sizes, elapsed)
    }

    pub fn figure(&self, table: &Table) -> Result<(Figure, Polynomial), DataError> {
        let samples = self.samples(table)?;
        let (x, y) = TimingSample::sorted_axes(&samples);
        let trend = fit_polynomial_trend(&x, &y, self.degree)?;
        log::debug!("{}: trend {}", self.output.display(), trend);

        let mut figure = Figure::new(self.x_label.as_str(), self.y_label.as_str());
        figure.grid = true;
        figure.canvas = self.canvas;

        figure.push(
            Series::from_axes(self.data_label.as_str(), &x, &y)
                .style(LineStyle::SolidWithMarkers)
                .alpha(TIMING_ALPHA),
        );

        // x is sorted and non-empty once the fit succeeded.
        let (lo, hi) = (x[0], x[x.len() - 1]);
        figure.push(
            Series::new(
                self.fit_label.as_str(),
                trend.sample(lo, hi, self.trend_points.max(2)),
            )
            .style(LineStyle::Dashed)
            .alpha(TIMING_ALPHA),
        );
        Ok((figure, trend))
    }

    pub fn run(&self, base: &Path) -> Result<PathBuf> {
        let table = load(base, &self.file)?;
        let (figure, _) = self.figure(&table)?;
        render(&figure, base, &self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    #[test]
    fn brute_force_sizes_from_column() {
        let n = vec![7.0, 1.0, 3.0, 5.0];
        let table = Table::from_columns([
            Column::new("parameter_N", n.clone()),
            Column::new("mean", n.iter().map(|v| 0.5 * v * v * v).collect()),
        ]);
        let (figure, trend) = TimingJob::brute_force().figure(&table).unwrap();

        let data = &figure.series[0];
        assert_eq!(data.points.first(), Some(&(1.0, 0.5)));
        assert_eq!(data.points.last(), Some(&(7.0, 171.5)));
        assert!((trend.eval(3.0) - 13.5).abs() < 1e-8);

        let fit = &figure.series[1];
        assert_eq!(fit.points.len(), 100);
        assert_eq!(fit.points[0].0, 1.0);
        assert_eq!(fit.points[99].0, 7.0);
        assert!(figure.grid);
    }

    #[test]
    fn divide_and_conquer_sizes_are_multiples() {
        let table = Table::from_columns([Column::new(
            "mean",
            (1..=10).map(|i| 0.1 * i as f64).collect(),
        )]);
        let job = TimingJob::divide_and_conquer();
        let samples = job.samples(&table).unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0].problem_size, 1_048_575);
        assert_eq!(samples[9].problem_size, 10_485_750);

        let (figure, trend) = job.figure(&table).unwrap();
        assert_eq!(trend.degree(), 1);
        assert_eq!(figure.canvas.pixels(), (2400, 1350));
    }

    #[test]
    fn overflowing_multiples_are_rejected() {
        let table = Table::from_columns([Column::new("mean", vec![0.1, 0.2, 0.3])]);
        let job = TimingJob {
            sizes: ProblemSizes::Multiples {
                base: u64::MAX / 2,
                count: 3,
            },
            ..TimingJob::divide_and_conquer()
        };
        assert!(matches!(
            job.samples(&table),
            Err(DataError::InvalidValue { row: 2, .. })
        ));
    }

    #[test]
    fn timing_rows_must_match_sizes() {
        let table = Table::from_columns([Column::new("mean", vec![0.1, 0.2])]);
        assert!(matches!(
            TimingJob::divide_and_conquer().samples(&table),
            Err(DataError::LengthMismatch { expected: 10, actual: 2, .. })
        ));
    }
}
