use std::path::Path;

use anyhow::Context;
use pq_plot::config::{Manifest, MANIFEST_FILE};
use pq_plot::figures;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manifest_path = Path::new(MANIFEST_FILE);
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("reading {MANIFEST_FILE}"))?;
    let written = figures::run_all(&manifest.figures, Path::new("."))?;
    log::info!("rendered {} figures", written.len());
    Ok(())
}
