use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use rusty_filters::data::loader::load_file;
use rusty_filters::data::model::{ColumnType, Value};
use rusty_filters::data::source::DataSource;
use rusty_filters::data::writer::write_csv;
use rusty_filters::filters::Resize;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rusty_filters_{}_{name}", std::process::id()))
}

#[test]
fn test_load_csv() {
    let path = temp_path("load.csv");
    std::fs::write(&path, "time,signal,label,flag\n0,1.5,a,true\n1,,b,false\n2,2,c,true\n").unwrap();
    let dataset = load_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dataset.column_names, vec!["time", "signal", "label", "flag"]);
    assert_eq!(dataset.len(), 3);
    assert_eq!(
        dataset.table.column_types(),
        vec![ColumnType::Integer, ColumnType::Float, ColumnType::String, ColumnType::Bool]
    );
    assert_eq!(dataset.table.get(1, 1), Value::Null);
    assert_eq!(dataset.table.get(1, 2), Value::Float(2.0));
    assert_eq!(dataset.table.get(2, 0), Value::from("a"));
    assert_eq!(dataset.table.get(3, 1), Value::Bool(false));
}

#[test]
fn test_load_json_records() {
    let path = temp_path("load.json");
    std::fs::write(
        &path,
        r#"[ { "b": 1, "a": 0.5 }, { "a": 1.5, "c": "x" }, { "b": true, "a": 2 } ]"#,
    )
    .unwrap();
    let dataset = load_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    // union of keys, sorted
    assert_eq!(dataset.column_names, vec!["a", "b", "c"]);
    assert_eq!(
        dataset.table.column_types(),
        vec![ColumnType::Float, ColumnType::String, ColumnType::String]
    );
    assert_eq!(dataset.table.get(0, 2), Value::Float(2.0));
    // mixed column stored as text
    assert_eq!(dataset.table.get(1, 0), Value::from("1"));
    assert_eq!(dataset.table.get(1, 1), Value::Null);
    assert_eq!(dataset.table.get(1, 2), Value::from("true"));
    assert_eq!(dataset.table.get(2, 1), Value::from("x"));
}

#[test]
fn test_load_json_rejects_non_array() {
    let path = temp_path("object.json");
    std::fs::write(&path, r#"{ "a": 1 }"#).unwrap();
    let result = load_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_load_parquet() {
    let path = temp_path("load.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("n", DataType::Int32, false),
        Field::new("x", DataType::Float64, true),
        Field::new("s", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3])),
            Arc::new(Float64Array::from(vec![Some(0.5), None, Some(2.5)])),
            Arc::new(StringArray::from(vec!["a", "b", "c"])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let dataset = load_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dataset.column_names, vec!["n", "x", "s"]);
    assert_eq!(
        dataset.table.column_types(),
        vec![ColumnType::Integer, ColumnType::Float, ColumnType::String]
    );
    assert_eq!(dataset.table.get(0, 2), Value::Integer(3));
    assert_eq!(dataset.table.get(1, 1), Value::Null);
    assert_eq!(dataset.table.get(2, 0), Value::from("a"));
}

#[test]
fn test_unsupported_extension() {
    assert!(load_file(&temp_path("data.xlsx")).is_err());
}

#[test]
fn test_write_csv() {
    let path = temp_path("write.csv");
    std::fs::write(&path, "a,b\n1,2.5\n3,\n").unwrap();
    let dataset = load_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut out = Vec::new();
    write_csv(dataset.table.as_ref(), &dataset.column_names, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a,b\n1,2.5\n3,\n");

    // names no longer match the column count
    let resized = Resize::new(dataset.table.clone() as Rc<dyn DataSource>, 1, 1).unwrap();
    let mut out = Vec::new();
    write_csv(resized.as_ref(), &dataset.column_names, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("col0\n"));
    assert_eq!(text.lines().count(), 2);
}
