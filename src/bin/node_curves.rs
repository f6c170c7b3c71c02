//! Closed-form node approximations and their relative errors.

use std::path::Path;

use pq_plot::figures::{self, CurvesJob, ErrorJob, FigureJob};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let jobs = [
        FigureJob::CurveComparison(CurvesJob::default()),
        FigureJob::RelativeError(ErrorJob::node_approximations()),
    ];
    figures::run_all(&jobs, Path::new("."))?;
    Ok(())
}
