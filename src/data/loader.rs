use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ColumnType, Dataset, Value};
use super::table::DataTable;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat numeric, boolean or string columns (recommended)
/// * `.json`    – `[{ "time": 0.0, "signal": 1.5, ... }, ...]`
/// * `.csv`     – header row, one value per cell
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    info!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

/// Build a dataset from named columns of raw values, inferring each
/// column's type.
fn build_dataset(column_names: Vec<String>, columns: Vec<Vec<Value>>) -> Result<Dataset> {
    let types: Vec<ColumnType> = columns.iter().map(|c| ColumnType::infer(c)).collect();
    let row_count = columns.first().map_or(0, Vec::len);

    let table = DataTable::new(types.clone());
    for row in 0..row_count {
        let cells = columns
            .iter()
            .zip(&types)
            .map(|(c, &ty)| match (&c[row], ty) {
                // mixed columns fall back to text
                (Value::Null, _) | (Value::String(_), _) => c[row].clone(),
                (v, ColumnType::String) => Value::String(v.to_string()),
                (v, _) => v.clone(),
            })
            .collect();
        table
            .push_row(cells)
            .with_context(|| format!("Row {row}: invalid values"))?;
    }

    Ok(Dataset {
        column_names,
        table: Rc::new(table),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// A JSON file holds an array of flat records:
///
/// ```json
/// [
///   { "time": 0.0, "signal": 0.12, "label": "a" },
///   { "time": 0.5, "signal": 0.14, "label": "b" }
/// ]
/// ```
///
/// Columns are the union of all record keys, in key order. A key missing
/// from a record reads as null.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut names: BTreeSet<String> = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        names.extend(obj.keys().cloned());
        objects.push(obj);
    }

    let column_names: Vec<String> = names.into_iter().collect();
    let columns = column_names
        .iter()
        .map(|name| {
            objects
                .iter()
                .map(|obj| obj.get(name).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    build_dataset(column_names, columns)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => {
            warn!("nested JSON value stored as text: {other}");
            Value::String(other.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one value per cell.
/// Empty cells are nulls; column types are inferred from the values.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let column_names: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); column_names.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col, column) in columns.iter_mut().enumerate() {
            column.push(guess_value(record.get(col).unwrap_or("")));
        }
    }

    build_dataset(column_names, columns)
}

fn guess_value(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns.
///
/// Int32/Int64 become integer columns, Float32/Float64 float columns,
/// Boolean and Utf8/LargeUtf8 keep their kind. Other column types are
/// rejected. Record batches are concatenated in file order.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); column_names.len()];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col);
            for row in 0..batch.num_rows() {
                let value = extract_value(array, row)
                    .with_context(|| format!("column '{}'", column_names[col]))?;
                column.push(value);
            }
        }
    }

    build_dataset(column_names, columns)
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => {
            let arr = any.downcast_ref::<Int32Array>().context("expected Int32Array")?;
            Value::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = any.downcast_ref::<Int64Array>().context("expected Int64Array")?;
            Value::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = any.downcast_ref::<Float32Array>().context("expected Float32Array")?;
            Value::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = any.downcast_ref::<Float64Array>().context("expected Float64Array")?;
            Value::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = any.downcast_ref::<BooleanArray>().context("expected BooleanArray")?;
            Value::Bool(arr.value(row))
        }
        DataType::Utf8 => {
            let arr = any.downcast_ref::<StringArray>().context("expected StringArray")?;
            Value::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = any
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Value::String(arr.value(row).to_string())
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
