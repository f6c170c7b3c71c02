//! Divide-and-conquer run times with a linear trend.

use std::path::Path;

use pq_plot::figures::{self, FigureJob, TimingJob};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let jobs = [FigureJob::TimingTrend(TimingJob::divide_and_conquer())];
    figures::run_all(&jobs, Path::new("."))?;
    Ok(())
}
