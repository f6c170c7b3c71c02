use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Table};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a result table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat numeric columns (what the experiments write)
/// * `.csv`     – header row, one numeric value per cell
/// * `.json`    – `[{ "t": 0.0, "q": 1.0 }, ...]` or `{ "t": [...], "q": [...] }`
///
/// Null and empty cells become `NaN`.
pub fn load_file(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }?;

    log::debug!("loaded {} from {}", table, path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts both `df.to_json(orient='records')` and `orient='list'` layouts.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    match root {
        JsonValue::Array(records) => json_records(&records),
        JsonValue::Object(columns) => columns
            .into_iter()
            .map(|(name, values)| {
                let values = match values {
                    JsonValue::Array(values) => values,
                    _ => {
                        return Err(DataError::InvalidValue {
                            column: name,
                            row: 0,
                            message: "expected an array of numbers".to_string(),
                        })
                    }
                };
                let values = values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| json_to_f64(v, &name, row))
                    .collect::<Result<Vec<f64>>>()?;
                Ok(Column::new(name, values))
            })
            .collect::<Result<Vec<Column>>>()
            .map(Table::from_columns),
        _ => Err(DataError::InvalidValue {
            column: String::new(),
            row: 0,
            message: "expected a top-level JSON array or object".to_string(),
        }),
    }
}

fn json_records(records: &[JsonValue]) -> Result<Table> {
    let mut order: Vec<String> = Vec::new();
    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for (row, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::InvalidValue {
            column: String::new(),
            row,
            message: "record is not a JSON object".to_string(),
        })?;

        for (key, val) in obj {
            let value = json_to_f64(val, key, row)?;
            let column = columns.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                Vec::with_capacity(records.len())
            });
            // Keys missing from earlier records become nulls.
            column.resize(row, f64::NAN);
            column.push(value);
        }
    }

    let n_rows = records.len();
    Ok(Table::from_columns(order.into_iter().map(|name| {
        let mut values = columns.remove(&name).unwrap_or_default();
        values.resize(n_rows, f64::NAN);
        Column::new(name, values)
    })))
}

fn json_to_f64(val: &JsonValue, column: &str, row: usize) -> Result<f64> {
    match val {
        JsonValue::Null => Ok(f64::NAN),
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| DataError::InvalidValue {
            column: column.to_string(),
            row,
            message: format!("{n} does not fit in f64"),
        }),
        other => Err(DataError::InvalidValue {
            column: column.to_string(),
            row,
            message: format!("{other} is not a number"),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, numeric cells below.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        for (col_idx, cell) in record.iter().enumerate() {
            let value = parse_cell(cell, &headers[col_idx], row)?;
            columns[col_idx].push(value);
        }
    }

    Ok(Table::from_columns(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values)),
    ))
}

fn parse_cell(s: &str, column: &str, row: usize) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| DataError::InvalidValue {
        column: column.to_string(),
        row,
        message: format!("'{s}' is not a number"),
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat numeric columns.
///
/// Any integer or floating-point physical type is widened to `f64`.
/// Non-numeric columns are skipped.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut order: Vec<String> = Vec::new();
    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            if !col.data_type().is_numeric() {
                log::debug!(
                    "skipping non-numeric column '{}' ({:?})",
                    field.name(),
                    col.data_type()
                );
                continue;
            }

            let widened = cast(col.as_ref(), &DataType::Float64)?;
            let values = widened.as_primitive::<Float64Type>();

            let column = columns.entry(field.name().clone()).or_insert_with(|| {
                order.push(field.name().clone());
                Vec::new()
            });
            column.extend(values.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    Ok(Table::from_columns(order.into_iter().map(|name| {
        let values = columns.remove(&name).unwrap_or_default();
        Column::new(name, values)
    })))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("true.parquet")).unwrap_err();
        assert!(matches!(err, DataError::FileNotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "data.xlsx", "");
        assert!(matches!(
            load_file(&path),
            Err(DataError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn csv_with_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "timing.csv",
            "parameter_N,mean\n1,0.5\n3, 1.5\n7,\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.column("parameter_N").unwrap(), &[1.0, 3.0, 7.0]);
        let mean = table.column("mean").unwrap();
        assert_eq!(&mean[..2], &[0.5, 1.5]);
        assert!(mean[2].is_nan());
    }

    #[test]
    fn csv_rejects_text_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.csv", "k,y\n1,abc\n");
        assert!(matches!(
            load_file(&path),
            Err(DataError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn json_records_fill_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "data.json",
            r#"[{"x": 0.0, "one": 1.0}, {"x": 1.0}, {"x": 2.0, "one": null}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.column("x").unwrap(), &[0.0, 1.0, 2.0]);
        let one = table.column("one").unwrap();
        assert_eq!(one.len(), 3);
        assert_eq!(one[0], 1.0);
        assert!(one[1].is_nan() && one[2].is_nan());
    }

    #[test]
    fn json_columns_orientation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "data.json", r#"{"k": [1, 2], "y_hat": [0.5]}"#);
        let table = load_file(&path).unwrap();
        assert_eq!(table.column("k").unwrap(), &[1.0, 2.0]);
        assert_eq!(table.column("y_hat").unwrap(), &[0.5]);
    }

    #[test]
    fn parquet_widens_integers_and_keeps_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("dc_1", DataType::Float64, true),
            Field::new("n", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(4.0), None, None])),
                Arc::new(Int64Array::from(vec![1, 3, 7])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["dc_1", "n"]);
        assert_eq!(table.column("n").unwrap(), &[1.0, 3.0, 7.0]);
        assert_eq!(table.finite_head("dc_1", 1).unwrap(), &[4.0]);
        assert!(table.column("dc_1").unwrap()[1].is_nan());
    }
}
