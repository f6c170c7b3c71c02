use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Column – one named numeric column of a result table
// ---------------------------------------------------------------------------

/// A named column. Null cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// Columns addressable by name, in file order.
///
/// Columns may have different lengths: frames written from ragged series
/// (one column per approximation level) are common in the experiment output.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: BTreeMap<String, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns. A repeated name replaces the earlier column.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut table = Table::new();
        for column in columns {
            table.push(column);
        }
        table
    }

    pub fn push(&mut self, column: Column) {
        match self.index.get(&column.name) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.index.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Length of the longest column.
    pub fn num_rows(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All values of a column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.index
            .get(name)
            .map(|&idx| self.columns[idx].values.as_slice())
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// The first `n` values of a column. Fails instead of truncating when
    /// the column is shorter than `n`.
    pub fn head(&self, name: &str, n: usize) -> Result<&[f64]> {
        let values = self.column(name)?;
        values
            .get(..n)
            .ok_or_else(|| DataError::length_mismatch(format!("column '{name}'"), n, values.len()))
    }

    /// Like [`Table::head`], additionally rejecting null / non-finite cells.
    pub fn finite_head(&self, name: &str, n: usize) -> Result<&[f64]> {
        let values = self.head(name, n)?;
        ensure_finite(name, values)?;
        Ok(values)
    }

    /// A column that must hold exactly `n` finite values.
    pub fn exact(&self, name: &str, n: usize) -> Result<&[f64]> {
        let values = self.column(name)?;
        if values.len() != n {
            return Err(DataError::length_mismatch(format!("column '{name}'"), n, values.len()));
        }
        ensure_finite(name, values)?;
        Ok(values)
    }

    /// A column of problem sizes: finite, non-negative whole numbers.
    pub fn sizes(&self, name: &str) -> Result<Vec<u64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, &v)| {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                    Ok(v as u64)
                } else {
                    Err(DataError::InvalidValue {
                        column: name.to_string(),
                        row,
                        message: format!("{v} is not a problem size"),
                    })
                }
            })
            .collect()
    }

    /// Pair two columns into a [`Signal`].
    pub fn signal(&self, x: &str, y: &str) -> Result<Signal> {
        let xs = self.column(x)?;
        let ys = self.column(y)?;
        Signal::validated(x, xs.to_vec(), y, ys.to_vec())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{}[{}]", c.name, c.values.len()))
            .collect();
        write!(f, "Table({})", parts.join(", "))
    }
}

pub(crate) fn ensure_finite(column: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(DataError::InvalidValue {
            column: column.to_string(),
            row,
            message: format!("{} is not a finite number", values[row]),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Signal – the ground-truth trajectory
// ---------------------------------------------------------------------------

/// Ground-truth samples: non-empty, equal-length axes, `x` non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Signal {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::validated("x", x, "y", y)
    }

    fn validated(x_name: &str, x: Vec<f64>, y_name: &str, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(DataError::length_mismatch(
                format!("signal '{y_name}' over '{x_name}'"),
                x.len(),
                y.len(),
            ));
        }
        if x.is_empty() {
            return Err(DataError::length_mismatch(format!("signal axis '{x_name}'"), 1, 0));
        }
        ensure_finite(x_name, &x)?;
        ensure_finite(y_name, &y)?;
        if let Some(row) = x.windows(2).position(|w| w[1] < w[0]) {
            return Err(DataError::Unsorted {
                column: x_name.to_string(),
                row: row + 1,
            });
        }
        Ok(Signal { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// First sample `(x, y)`.
    pub fn first(&self) -> (f64, f64) {
        (self.x[0], self.y[0])
    }

    /// Last sample `(x, y)`.
    pub fn last(&self) -> (f64, f64) {
        let n = self.x.len() - 1;
        (self.x[n], self.y[n])
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

// ---------------------------------------------------------------------------
// TimingSample – one timed run of an experiment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSample {
    pub problem_size: u64,
    pub elapsed_seconds: f64,
}

impl TimingSample {
    /// Zip problem sizes with timings.
    pub fn zip(sizes: &[u64], elapsed: &[f64]) -> Result<Vec<TimingSample>> {
        if sizes.len() != elapsed.len() {
            return Err(DataError::length_mismatch("timing samples", sizes.len(), elapsed.len()));
        }
        Ok(sizes
            .iter()
            .zip(elapsed)
            .map(|(&problem_size, &elapsed_seconds)| TimingSample {
                problem_size,
                elapsed_seconds,
            })
            .collect())
    }

    /// Order samples by problem size (stable for equal sizes) and split them
    /// into plotting axes.
    pub fn sorted_axes(samples: &[TimingSample]) -> (Vec<f64>, Vec<f64>) {
        let mut sorted = samples.to_vec();
        sorted.sort_by_key(|s| s.problem_size);
        sorted
            .into_iter()
            .map(|s| (s.problem_size as f64, s.elapsed_seconds))
            .unzip()
    }
}
