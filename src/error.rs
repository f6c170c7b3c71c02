use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a result table and handing
/// aligned series to the renderer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("{context}: expected {expected} values, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("division by zero: true value at index {index} is zero")]
    DivideByZero { index: usize },

    #[error("approximation level must be at least 1, got {0}")]
    InvalidLevel(u32),

    #[error("polynomial degree {degree} needs more than {points} points")]
    InvalidDegree { degree: usize, points: usize },

    #[error("column '{column}', row {row}: {message}")]
    InvalidValue {
        column: String,
        row: usize,
        message: String,
    },

    #[error("column '{column}' is not sorted at row {row}")]
    Unsorted { column: String, row: usize },

    #[error("least-squares fit failed: {0}")]
    SingularFit(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl DataError {
    pub(crate) fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        DataError::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
