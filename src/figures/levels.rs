use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{load, power_of_two_label, render, ESTIMATE_ALPHA, REFERENCE_ALPHA, REFERENCE_COLOR};
use crate::align::align_levels;
use crate::data::Table;
use crate::error::DataError;
use crate::render::{Canvas, Figure, LineStyle, Series};

/// Ground-truth path against its coarse reconstructions at `N = 2^i - 1`
/// interior nodes, `i = 1..=levels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsJob {
    pub truth_file: PathBuf,
    pub truth_x: String,
    pub truth_y: String,
    pub truth_label: String,
    pub levels_file: PathBuf,
    /// Level `i` is read from column `{prefix}_{i}`.
    pub prefix: String,
    pub levels: u32,
    pub approx_label: String,
    pub x_label: String,
    pub y_label: String,
    pub output: PathBuf,
    pub canvas: Canvas,
}

impl Default for LevelsJob {
    fn default() -> Self {
        LevelsJob {
            truth_file: PathBuf::from("true.parquet"),
            truth_x: "t".to_string(),
            truth_y: "q".to_string(),
            truth_label: "q_true (ω = 1, T = 2π/3)".to_string(),
            levels_file: PathBuf::from("data.parquet"),
            prefix: "bf".to_string(),
            levels: 3,
            approx_label: "q̂_bf".to_string(),
            x_label: "t".to_string(),
            y_label: "q".to_string(),
            output: PathBuf::from("harmonic_bf.png"),
            canvas: Canvas::default(),
        }
    }
}

impl LevelsJob {
    pub fn brute_force() -> Self {
        Self::default()
    }

    pub fn divide_and_conquer() -> Self {
        LevelsJob {
            prefix: "dc".to_string(),
            approx_label: "q̂_dc".to_string(),
            output: PathBuf::from("harmonic_dc.png"),
            ..Self::default()
        }
    }

    pub fn figure(&self, truth: &Table, levels: &Table) -> Result<Figure, DataError> {
        let signal = truth.signal(&self.truth_x, &self.truth_y)?;
        let aligned = align_levels(&signal, levels, &self.prefix, self.levels)?;

        let mut figure = Figure::new(self.x_label.as_str(), self.y_label.as_str());
        figure.tight = true;
        figure.canvas = self.canvas;

        figure.push(
            Series::new(self.truth_label.as_str(), signal.points())
                .color(REFERENCE_COLOR)
                .alpha(REFERENCE_ALPHA),
        );
        for (idx, level) in aligned.iter().enumerate() {
            let label = format!(
                "{} (N = {} − 1)",
                self.approx_label,
                power_of_two_label(level.level)
            );
            figure.push(
                Series::new(label, level.points())
                    .style(LineStyle::nth(idx))
                    .alpha(ESTIMATE_ALPHA),
            );
        }
        Ok(figure)
    }

    pub fn run(&self, base: &Path) -> Result<PathBuf> {
        let truth = load(base, &self.truth_file)?;
        let levels = load(base, &self.levels_file)?;
        let figure = self.figure(&truth, &levels)?;
        render(&figure, base, &self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn truth() -> Table {
        Table::from_columns([
            Column::new("t", vec![0.0, 0.5, 1.0, 1.5, 2.0]),
            Column::new("q", vec![0.0, 4.0, 8.0, 14.0, 20.0]),
        ])
    }

    fn levels() -> Table {
        Table::from_columns([
            Column::new("dc_1", vec![10.0, f64::NAN, f64::NAN, f64::NAN]),
            Column::new("dc_2", vec![5.0, 10.0, 15.0, f64::NAN]),
        ])
    }

    #[test]
    fn builds_truth_plus_each_level() {
        let job = LevelsJob {
            levels: 2,
            ..LevelsJob::divide_and_conquer()
        };
        let figure = job.figure(&truth(), &levels()).unwrap();

        assert!(figure.tight);
        assert_eq!(figure.series.len(), 3);
        assert_eq!(figure.series[0].points.len(), 5);
        assert_eq!(figure.series[0].color, Some(REFERENCE_COLOR));

        let level_1 = &figure.series[1];
        assert_eq!(level_1.label, "q̂_dc (N = 2¹ − 1)");
        assert_eq!(level_1.points, vec![(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)]);
        assert_eq!(level_1.style, LineStyle::Solid);

        let level_2 = &figure.series[2];
        assert_eq!(level_2.points.len(), 5);
        assert_eq!(level_2.points[2], (1.0, 10.0));
        assert_eq!(level_2.style, LineStyle::Dashed);
    }

    #[test]
    fn missing_level_column_is_reported() {
        let job = LevelsJob::divide_and_conquer();
        let err = job.figure(&truth(), &levels()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "dc_3"), "{err}");
    }
}
