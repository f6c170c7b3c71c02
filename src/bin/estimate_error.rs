//! Relative error of a per-step estimate.

use std::path::Path;

use pq_plot::figures::{self, ErrorJob, FigureJob};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let jobs = [FigureJob::RelativeError(ErrorJob::estimate())];
    figures::run_all(&jobs, Path::new("."))?;
    Ok(())
}
