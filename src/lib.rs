//! Comparison plots for least-action path experiments.
//!
//! The experiments write tables of ground-truth paths, coarse approximations
//! at `2^i - 1` interior nodes, closed-form estimates and run times. This
//! crate loads those tables, aligns the approximations with the ground truth,
//! computes relative errors and polynomial timing trends, and renders PNG
//! figures.

pub mod align;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figures;
pub mod fit;
pub mod render;

pub use align::{
    align_level, align_levels, build_approximation_axis, pad_with_endpoints, relative_error,
    relative_error_with, ApproximationLevel, ZeroPolicy,
};
pub use error::DataError;
pub use fit::{fit_polynomial_trend, Polynomial};
