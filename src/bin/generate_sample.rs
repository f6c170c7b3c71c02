use std::f64::consts::PI;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use pq_plot::config::{Manifest, MANIFEST_FILE};
use pq_plot::figures::{CurvesJob, ErrorJob, FigureJob, LevelsJob, TimingJob};

const OUT_DIR: &str = "sample_data";

// Boundary-value problem of the harmonic oscillator: q(0) = A, q(T) = B.
const A: f64 = 0.0;
const B: f64 = 20.0;
const OMEGA: f64 = 1.0;
const T: f64 = 2.0 * PI / 3.0;
/// Spacing of the node pool the path searches pick from.
const DQ: f64 = 0.1;

fn harmonic_path(t: f64) -> f64 {
    A * (OMEGA * t).cos() + (B - A * (OMEGA * T).cos()) / (OMEGA * T).sin() * (OMEGA * t).sin()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write nullable Float64 columns; shorter columns are padded with nulls.
fn write_parquet(path: &Path, columns: Vec<(String, Vec<f64>)>) -> Result<()> {
    let n_rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(name.as_str(), DataType::Float64, true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| {
            let mut cells: Vec<Option<f64>> = values.into_iter().map(Some).collect();
            cells.resize(n_rows, None);
            Arc::new(Float64Array::from(cells)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sample tables
// ---------------------------------------------------------------------------

fn ground_truth(dir: &Path) -> Result<()> {
    let t = linspace(0.0, T, 1000);
    let q: Vec<f64> = t.iter().map(|&t| harmonic_path(t)).collect();
    write_parquet(&dir.join("true.parquet"), vec![("t".into(), t), ("q".into(), q)])
}

/// Interior nodes of each level: the exact path snapped to the node pool,
/// with search noise that is larger for divide-and-conquer.
fn approximation_levels(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (prefix, noise) in [("bf", 0.15), ("dc", 0.6)] {
        for i in 1..=3u32 {
            let n = (1usize << i) - 1;
            let nodes: Vec<f64> = (1..=n)
                .map(|k| {
                    let t = T * k as f64 / (n + 1) as f64;
                    let q = harmonic_path(t) + rng.gauss(0.0, noise);
                    (q / DQ).round() * DQ
                })
                .collect();
            columns.push((format!("{prefix}_{i}"), nodes));
        }
    }
    write_parquet(&dir.join("levels.parquet"), columns)
}

/// Half-period amplitude of the harmonic oscillator and its node estimates.
fn node_theory(dir: &Path) -> Result<()> {
    fn map(x: &[f64], f: fn(f64) -> f64) -> Vec<f64> {
        x.iter().map(|&v| f(v)).collect()
    }

    let x = linspace(1e-3, PI / 2.0, 1000);

    let columns = vec![
        ("harmonic".to_string(), map(&x, |x| 1.0 / (x / 2.0).cos())),
        (
            "pade".to_string(),
            map(&x, |x| (1.0 + x.powi(2) / 48.0) / (1.0 - 5.0 * x.powi(2) / 48.0)),
        ),
        ("taylor".to_string(), map(&x, |x| 1.0 + x.powi(2) / 8.0)),
        (
            "one".to_string(),
            map(&x, |x| (1.0 + x.powi(2) / 16.0) / (1.0 - x.powi(2) / 16.0)),
        ),
        (
            "three".to_string(),
            map(&x, |x| {
                (1.0 + x.powi(2) / 16.0 + x.powi(4) / 1024.0)
                    / (1.0 - 3.0 * x.powi(2) / 16.0 + x.powi(4) / 1024.0)
            }),
        ),
    ];

    let mut all = vec![("x".to_string(), x.clone())];
    all.extend(columns);
    write_parquet(&dir.join("theory.parquet"), all)
}

fn timings(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let brute_force: Vec<Vec<f64>> = (1..=9)
        .map(|n| {
            let n = n as f64;
            vec![n, 2e-4 * n.powi(3) * (1.0 + rng.gauss(0.0, 0.03)).max(0.5)]
        })
        .collect();
    write_csv(&dir.join("free_body_1d_bf.csv"), &["parameter_N", "mean"], &brute_force)?;

    let dnc: Vec<Vec<f64>> = (1..=10)
        .map(|i| vec![0.42 * i as f64 + rng.gauss(0.0, 0.02)])
        .collect();
    write_csv(&dir.join("fb_1d_dc.csv"), &["mean"], &dnc)
}

fn estimate(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let rows: Vec<Vec<f64>> = (1..=50)
        .map(|k| {
            let k = k as f64;
            let y_true = 2.0 + (k / 8.0).sin();
            let y_hat = y_true * (1.0 + rng.gauss(0.0, 0.5 / k));
            vec![k, y_hat, y_true]
        })
        .collect();
    write_csv(&dir.join("estimate.csv"), &["k", "y_hat", "y_true"], &rows)
}

/// Manifest rendering every figure from the sample tables.
fn manifest() -> Manifest {
    let levels = |job: LevelsJob| {
        FigureJob::ApproximationLevels(LevelsJob {
            levels_file: PathBuf::from("levels.parquet"),
            ..job
        })
    };
    Manifest {
        figures: vec![
            levels(LevelsJob::brute_force()),
            levels(LevelsJob::divide_and_conquer()),
            FigureJob::CurveComparison(CurvesJob {
                file: PathBuf::from("theory.parquet"),
                ..CurvesJob::default()
            }),
            FigureJob::RelativeError(ErrorJob {
                file: PathBuf::from("theory.parquet"),
                ..ErrorJob::node_approximations()
            }),
            FigureJob::RelativeError(ErrorJob::estimate()),
            FigureJob::TimingTrend(TimingJob::brute_force()),
            FigureJob::TimingTrend(TimingJob::divide_and_conquer()),
        ],
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let dir = Path::new(OUT_DIR);
    std::fs::create_dir_all(dir).with_context(|| format!("creating {OUT_DIR}"))?;

    let mut rng = SimpleRng::new(42);

    ground_truth(dir)?;
    approximation_levels(dir, &mut rng)?;
    node_theory(dir)?;
    timings(dir, &mut rng)?;
    estimate(dir, &mut rng)?;
    manifest().save(&dir.join(MANIFEST_FILE))?;

    println!("Wrote sample tables and {MANIFEST_FILE} to {OUT_DIR}/ (run pq-plot from there)");
    Ok(())
}
