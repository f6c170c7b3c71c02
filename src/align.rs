//! Series alignment: puts coarse approximation levels on the same axis as
//! the ground truth and measures how far estimates drift from it.
//!
//! An approximation level `i` stores only the `2^i - 1` interior nodes of a
//! path. Its x-positions are implicit (evenly spaced over the ground-truth
//! span) and its two boundary values are the ground-truth endpoints.

use serde::{Deserialize, Serialize};

use crate::data::{Signal, Table};
use crate::error::{DataError, Result};

/// Deepest level accepted; `2^32 + 1` axis points is already far past any
/// stored experiment.
pub const MAX_LEVEL: u32 = 32;

/// Number of interior nodes stored for level `i`.
pub fn interior_len(level: u32) -> Result<usize> {
    if level == 0 || level > MAX_LEVEL {
        return Err(DataError::InvalidLevel(level));
    }
    1usize
        .checked_shl(level)
        .map(|n| n - 1)
        .ok_or(DataError::InvalidLevel(level))
}

/// `2^i + 1` evenly spaced points over `[x_first, x_last]`, endpoints exact.
pub fn build_approximation_axis(x_first: f64, x_last: f64, level: u32) -> Result<Vec<f64>> {
    let segments = interior_len(level)? + 1;
    let step = (x_last - x_first) / segments as f64;
    let mut axis: Vec<f64> = (0..segments)
        .map(|k| x_first + step * k as f64)
        .collect();
    axis.push(x_last);
    Ok(axis)
}

/// `start`, then `interior` unchanged, then `end`.
pub fn pad_with_endpoints(interior: &[f64], start: f64, end: f64) -> Vec<f64> {
    let mut padded = Vec::with_capacity(interior.len() + 2);
    padded.push(start);
    padded.extend_from_slice(interior);
    padded.push(end);
    padded
}

// ---------------------------------------------------------------------------
// Relative error
// ---------------------------------------------------------------------------

/// What to do with an element whose true value is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Stop with [`DataError::DivideByZero`].
    #[default]
    Fail,
    /// Emit `NaN`; the renderer draws a gap there.
    Nan,
}

/// Elementwise `|true - estimate| / |true|`, failing on a zero true value.
pub fn relative_error(truth: &[f64], estimate: &[f64]) -> Result<Vec<f64>> {
    relative_error_with(truth, estimate, ZeroPolicy::Fail)
}

pub fn relative_error_with(truth: &[f64], estimate: &[f64], policy: ZeroPolicy) -> Result<Vec<f64>> {
    if truth.len() != estimate.len() {
        return Err(DataError::length_mismatch(
            "relative error estimate",
            truth.len(),
            estimate.len(),
        ));
    }
    truth
        .iter()
        .zip(estimate)
        .enumerate()
        .map(|(index, (&t, &e))| {
            if t == 0.0 {
                match policy {
                    ZeroPolicy::Fail => Err(DataError::DivideByZero { index }),
                    ZeroPolicy::Nan => Ok(f64::NAN),
                }
            } else {
                Ok((t - e).abs() / t.abs())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Approximation levels
// ---------------------------------------------------------------------------

/// One approximation level laid out on the ground-truth axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproximationLevel {
    pub level: u32,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ApproximationLevel {
    /// Number of interior nodes, `2^i - 1`.
    pub fn nodes(&self) -> usize {
        self.y.len() - 2
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

/// Align level `level` from `column` of `table` against `truth`.
///
/// Reads exactly the first `2^level - 1` cells; later cells (padding in
/// ragged frames) are ignored.
pub fn align_level(truth: &Signal, table: &Table, column: &str, level: u32) -> Result<ApproximationLevel> {
    let n = interior_len(level)?;
    let interior = table.finite_head(column, n)?;

    let (x_first, start) = truth.first();
    let (x_last, end) = truth.last();

    let x = build_approximation_axis(x_first, x_last, level)?;
    let y = pad_with_endpoints(interior, start, end);
    debug_assert_eq!(x.len(), y.len());

    Ok(ApproximationLevel { level, x, y })
}

/// Align levels `1..=levels` stored in columns `{prefix}_{i}`.
pub fn align_levels(truth: &Signal, table: &Table, prefix: &str, levels: u32) -> Result<Vec<ApproximationLevel>> {
    (1..=levels)
        .map(|i| align_level(truth, table, &level_column(prefix, i), i))
        .collect()
}

pub fn level_column(prefix: &str, level: u32) -> String {
    format!("{prefix}_{level}")
}
