use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::figures::FigureJob;

/// File the default binary looks for in the working directory.
pub const MANIFEST_FILE: &str = "pq-plot.json";

/// A list of figures to render. Paths inside jobs are relative to the
/// directory holding the manifest.
///
/// ```json
/// { "figures": [
///     { "kind": "approximation_levels", "prefix": "dc", "output": "harmonic_dc.png" },
///     { "kind": "timing_trend", "file": "fb_1d_dc.csv",
///       "sizes": { "rule": "multiples", "base": 1048575, "count": 10 }, "degree": 1 }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub figures: Vec<FigureJob>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Manifest> {
        if !path.exists() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::figures::{LevelsJob, ProblemSizes, TimingJob};

    #[test]
    fn partial_jobs_take_defaults() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "figures": [
                { "kind": "approximation_levels", "prefix": "dc", "output": "harmonic_dc.png" },
                { "kind": "timing_trend", "file": "fb_1d_dc.csv",
                  "sizes": { "rule": "multiples", "base": 1048575, "count": 10 }, "degree": 1 }
            ] }"#,
        )
        .unwrap();

        assert_eq!(manifest.figures.len(), 2);
        match &manifest.figures[0] {
            FigureJob::ApproximationLevels(job) => {
                assert_eq!(job.prefix, "dc");
                assert_eq!(job.truth_file, LevelsJob::default().truth_file);
                assert_eq!(job.levels, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &manifest.figures[1] {
            FigureJob::TimingTrend(job) => {
                assert_eq!(job.file, PathBuf::from("fb_1d_dc.csv"));
                assert_eq!(
                    job.sizes,
                    ProblemSizes::Multiples {
                        base: 1_048_575,
                        count: 10
                    }
                );
                assert_eq!(job.elapsed, TimingJob::default().elapsed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = serde_json::from_str::<Manifest>(r#"{ "figures": [ { "kind": "pie" } ] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Manifest::load(&dir.path().join(MANIFEST_FILE)),
            Err(DataError::FileNotFound(_))
        ));
    }
}
