//! Ground truth against brute-force and divide-and-conquer levels.

use std::path::Path;

use pq_plot::figures::{self, FigureJob, LevelsJob};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let jobs = [
        FigureJob::ApproximationLevels(LevelsJob::brute_force()),
        FigureJob::ApproximationLevels(LevelsJob::divide_and_conquer()),
    ];
    figures::run_all(&jobs, Path::new("."))?;
    Ok(())
}
