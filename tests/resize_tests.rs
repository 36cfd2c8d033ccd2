use std::rc::Rc;

use approx::assert_relative_eq;

use rusty_filters::data::model::{ColumnType, Value};
use rusty_filters::data::source::DataSource;
use rusty_filters::data::table::DataTable;
use rusty_filters::filters::Resize;
use rusty_filters::FilterError;

fn column(source: &dyn DataSource, col: usize) -> Vec<f64> {
    (0..source.row_count())
        .map(|row| source.get(col, row).to_f64_or_nan())
        .collect()
}

#[test]
fn test_identity_is_pass_through() {
    let table = DataTable::new(vec![ColumnType::Float, ColumnType::Integer]);
    for i in 0..5 {
        table.add(vec![Value::Float(i as f64 / 3.0), Value::Integer(i * i)]).unwrap();
    }
    let table = Rc::new(table);
    let resize = Resize::new(table.clone(), 2, 5).unwrap();

    assert_eq!(resize.row_count(), 5);
    assert_eq!(resize.column_count(), 2);
    assert_eq!(resize.column_types(), table.column_types());
    for row in 0..5 {
        for col in 0..2 {
            assert_eq!(resize.get(col, row), table.get(col, row));
        }
    }
}

#[test]
fn test_downsample_clean_windows() {
    let table = Rc::new(DataTable::from_column(&[1.0, 2.0, 3.0, 4.0]));
    let resize = Resize::new(table, 1, 2).unwrap();
    assert_eq!(resize.row_count(), 2);
    assert_eq!(column(resize.as_ref(), 0), vec![1.5, 3.5]);
}

#[test]
fn test_downsample_fractional_weights() {
    let table = Rc::new(DataTable::from_column(&[1.0, 2.0, 3.0]));
    let resize = Resize::new(table, 1, 2).unwrap();
    let out = column(resize.as_ref(), 0);
    assert_relative_eq!(out[0], (1.0 * 1.0 + 2.0 * 0.5) / 1.5, epsilon = 1e-12);
    assert_relative_eq!(out[1], (2.0 * 0.5 + 3.0 * 1.0) / 1.5, epsilon = 1e-12);
}

#[test]
fn test_upsample() {
    let table = Rc::new(DataTable::from_column(&[2.0, 4.0]));
    let resize = Resize::new(table, 1, 3).unwrap();
    let out = column(resize.as_ref(), 0);
    // step 2/3: the middle output straddles both inputs equally
    assert_relative_eq!(out[0], 2.0, epsilon = 1e-12);
    assert_relative_eq!(out[1], 3.0, epsilon = 1e-12);
    assert_relative_eq!(out[2], 4.0, epsilon = 1e-12);
}

#[test]
fn test_resize_columns() {
    let table = Rc::new(DataTable::from_rows(4, &[vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 0.0, 2.0, 2.0]]).unwrap());
    let resize = Resize::new(table, 2, 2).unwrap();
    assert_eq!(resize.column_count(), 2);
    assert_eq!(resize.column_types(), vec![ColumnType::Float; 2]);
    assert_eq!(column(resize.as_ref(), 0), vec![1.5, 0.0]);
    assert_eq!(column(resize.as_ref(), 1), vec![3.5, 2.0]);
    assert_eq!(resize.get(2, 0), Value::Null);
}

#[test]
fn test_rows_then_columns() {
    let table = Rc::new(
        DataTable::from_rows(
            2,
            &[
                vec![1.0, 2.0],
                vec![3.0, 4.0],
                vec![5.0, 6.0],
                vec![7.0, 8.0],
            ],
        )
        .unwrap(),
    );
    let resize = Resize::new(table, 1, 2).unwrap();
    assert_eq!((resize.target_cols(), resize.target_rows()), (1, 2));
    assert_eq!(column(resize.as_ref(), 0), vec![2.5, 6.5]);
}

#[test]
fn test_non_numeric_columns_rejected() {
    let table = DataTable::new(vec![ColumnType::Float, ColumnType::Bool]);
    table.add(vec![Value::Float(1.0), Value::Bool(true)]).unwrap();
    assert!(matches!(
        Resize::new(Rc::new(table), 1, 1),
        Err(FilterError::NonNumericColumn {
            col: 1,
            column_type: ColumnType::Bool
        })
    ));
}

#[test]
fn test_recomputes_on_upstream_change() {
    let table = Rc::new(DataTable::from_column(&[1.0, 2.0, 3.0, 4.0]));
    let resize = Resize::new(table.clone(), 1, 2).unwrap();

    table.add(vec![Value::Float(5.0)]).unwrap();
    let out = column(resize.as_ref(), 0);
    // step 2.5
    assert_relative_eq!(out[0], (1.0 + 2.0 + 0.5 * 3.0) / 2.5, epsilon = 1e-12);
    assert_relative_eq!(out[1], (0.5 * 3.0 + 4.0 + 5.0) / 2.5, epsilon = 1e-12);

    // back to an identity shape: reads go straight through
    table.remove(4).unwrap();
    table.remove(3).unwrap();
    assert_eq!(resize.row_count(), 2);
    let out = column(resize.as_ref(), 0);
    assert_relative_eq!(out[0], (1.0 + 0.5 * 2.0) / 1.5, epsilon = 1e-12);
    assert_relative_eq!(out[1], (0.5 * 2.0 + 3.0) / 1.5, epsilon = 1e-12);

    table.remove(2).unwrap();
    assert_eq!(column(resize.as_ref(), 0), vec![1.0, 2.0]);
}
