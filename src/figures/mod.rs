/// Figure jobs: one per plot the experiments need.
///
/// Every job splits into a pure `figure(..)` step (tables in, [`Figure`] out)
/// and a `run(base)` step that loads its inputs relative to `base`, renders,
/// and returns the path of the written PNG.
///
/// [`Figure`]: crate::render::Figure
pub mod curves;
pub mod levels;
pub mod relative;
pub mod timing;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::data::{load_file, Table};
use crate::error::DataError;
use crate::render::{LineStyle, Series};

pub use curves::CurvesJob;
pub use levels::LevelsJob;
pub use relative::ErrorJob;
pub use timing::{ProblemSizes, TimingJob};

/// Colour of the reference curve; drawn faint underneath the estimates.
pub const REFERENCE_COLOR: RGBColor = RGBColor(0, 0, 0);
pub const REFERENCE_ALPHA: f64 = 0.3;
pub const ESTIMATE_ALPHA: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureJob {
    ApproximationLevels(LevelsJob),
    CurveComparison(CurvesJob),
    RelativeError(ErrorJob),
    TimingTrend(TimingJob),
}

impl FigureJob {
    pub fn output(&self) -> &Path {
        match self {
            FigureJob::ApproximationLevels(job) => &job.output,
            FigureJob::CurveComparison(job) => &job.output,
            FigureJob::RelativeError(job) => &job.output,
            FigureJob::TimingTrend(job) => &job.output,
        }
    }

    pub fn run(&self, base: &Path) -> Result<PathBuf> {
        match self {
            FigureJob::ApproximationLevels(job) => job.run(base),
            FigureJob::CurveComparison(job) => job.run(base),
            FigureJob::RelativeError(job) => job.run(base),
            FigureJob::TimingTrend(job) => job.run(base),
        }
    }

    /// Every figure of the experiments, with their original file names.
    pub fn defaults() -> Vec<FigureJob> {
        vec![
            FigureJob::ApproximationLevels(LevelsJob::brute_force()),
            FigureJob::ApproximationLevels(LevelsJob::divide_and_conquer()),
            FigureJob::CurveComparison(CurvesJob::default()),
            FigureJob::RelativeError(ErrorJob::node_approximations()),
            FigureJob::RelativeError(ErrorJob::estimate()),
            FigureJob::TimingTrend(TimingJob::brute_force()),
            FigureJob::TimingTrend(TimingJob::divide_and_conquer()),
        ]
    }
}

/// Run every job, continuing past failures. Fails if any job failed.
pub fn run_all(jobs: &[FigureJob], base: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(jobs.len());
    let mut failed = 0usize;

    for job in jobs {
        match job.run(base) {
            Ok(path) => written.push(path),
            Err(err) => {
                failed += 1;
                log::warn!("{}: {err:#}", job.output().display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} figures failed", jobs.len());
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// A table column drawn as one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCurve {
    pub column: String,
    pub label: String,
    #[serde(default)]
    pub style: LineStyle,
}

impl ColumnCurve {
    pub fn new(column: &str, label: &str, style: LineStyle) -> Self {
        ColumnCurve {
            column: column.to_string(),
            label: label.to_string(),
            style,
        }
    }
}

pub(crate) fn load(base: &Path, file: &Path) -> Result<Table> {
    let path = base.join(file);
    load_file(&path).with_context(|| format!("loading {}", path.display()))
}

pub(crate) fn render(figure: &crate::render::Figure, base: &Path, output: &Path) -> Result<PathBuf> {
    let path = base.join(output);
    figure
        .render_png(&path)
        .with_context(|| format!("rendering {}", path.display()))?;
    Ok(path)
}

/// Pair `y` with `x`; both columns must have the same length.
pub(crate) fn column_series(table: &Table, x: &str, curve: &ColumnCurve) -> Result<Series, DataError> {
    let xs = table.column(x)?;
    let ys = table.column(&curve.column)?;
    if xs.len() != ys.len() {
        return Err(DataError::LengthMismatch {
            context: format!("column '{}' against '{x}'", curve.column),
            expected: xs.len(),
            actual: ys.len(),
        });
    }
    Ok(Series::from_axes(curve.label.as_str(), xs, ys).style(curve.style))
}

/// `2^i` with a superscript exponent, for legend labels.
pub fn power_of_two_label(i: u32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let exponent: String = i
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| DIGITS[d as usize]))
        .collect();
    format!("2{exponent}")
}
