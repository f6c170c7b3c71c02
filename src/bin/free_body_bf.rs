//! Brute-force run times with a cubic trend.

use std::path::Path;

use pq_plot::figures::{self, FigureJob, TimingJob};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let jobs = [FigureJob::TimingTrend(TimingJob::brute_force())];
    figures::run_all(&jobs, Path::new("."))?;
    Ok(())
}
