use std::rc::Rc;

use rusty_filters::data::model::{ColumnType, Value};
use rusty_filters::data::source::DataSource;
use rusty_filters::data::table::DataTable;
use rusty_filters::filters::{Convolution, Kernel, Mode, Resolved};
use rusty_filters::FilterError;

fn column(source: &dyn DataSource, col: usize) -> Vec<f64> {
    (0..source.row_count())
        .map(|row| source.get(col, row).to_f64_or_nan())
        .collect()
}

// ---------------------------------------------------------------------------
// Edge modes
// ---------------------------------------------------------------------------

#[test]
fn test_rows_inside_resolve_to_themselves() {
    for mode in [Mode::Omit, Mode::Zero, Mode::Repeat, Mode::Mirror, Mode::Circular] {
        for row in 0..4 {
            assert_eq!(mode.resolve(row, 4), Resolved::Row(row as usize), "{mode:?}");
        }
    }
}

#[test]
fn test_omit_and_zero() {
    assert!(matches!(Mode::Omit.resolve(-1, 4), Resolved::Synthetic(v) if v.is_nan()));
    assert!(matches!(Mode::Omit.resolve(4, 4), Resolved::Synthetic(v) if v.is_nan()));
    assert_eq!(Mode::Zero.resolve(-3, 4), Resolved::Synthetic(0.0));
    assert_eq!(Mode::Zero.resolve(7, 4), Resolved::Synthetic(0.0));
}

#[test]
fn test_repeat_clamps() {
    assert_eq!(Mode::Repeat.resolve(-3, 5), Resolved::Row(0));
    assert_eq!(Mode::Repeat.resolve(10, 5), Resolved::Row(4));
}

#[test]
fn test_mirror_symmetry() {
    for n in 2..8usize {
        let n_i = n as i64;
        assert_eq!(Mode::Mirror.resolve(-1, n), Mode::Mirror.resolve(1, n));
        assert_eq!(Mode::Mirror.resolve(n_i, n), Mode::Mirror.resolve(n_i - 2, n));
    }
}

#[test]
fn test_mirror_ping_pong() {
    // rows 0..=4 reflected back and forth
    let resolved: Vec<Resolved> = (-5..10).map(|row| Mode::Mirror.resolve(row, 5)).collect();
    let expected: Vec<Resolved> = [3, 4, 3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1, 0, 1]
        .into_iter()
        .map(Resolved::Row)
        .collect();
    assert_eq!(resolved, expected);
}

#[test]
fn test_mirror_single_row() {
    assert_eq!(Mode::Mirror.resolve(-2, 1), Resolved::Row(0));
    assert_eq!(Mode::Mirror.resolve(3, 1), Resolved::Row(0));
}

#[test]
fn test_circular_full_period() {
    for n in 1..8usize {
        let n_i = n as i64;
        for k in 0..n_i {
            assert_eq!(Mode::Circular.resolve(k - n_i, n), Mode::Circular.resolve(k, n));
            assert_eq!(Mode::Circular.resolve(k + n_i, n), Resolved::Row(k as usize));
            assert_eq!(Mode::Circular.resolve(k - 3 * n_i, n), Resolved::Row(k as usize));
        }
    }
    assert_eq!(Mode::Circular.resolve(-1, 5), Resolved::Row(4));
}

#[test]
fn test_empty_source() {
    for mode in [Mode::Omit, Mode::Repeat, Mode::Mirror, Mode::Circular] {
        assert!(matches!(mode.resolve(0, 0), Resolved::Synthetic(v) if v.is_nan()), "{mode:?}");
        assert!(matches!(mode.resolve(-3, 0), Resolved::Synthetic(v) if v.is_nan()), "{mode:?}");
    }
    // zero padding does not depend on the source
    assert_eq!(Mode::Zero.resolve(0, 0), Resolved::Synthetic(0.0));
    assert_eq!(Mode::Zero.resolve(-3, 0), Resolved::Synthetic(0.0));
}

// ---------------------------------------------------------------------------
// Filter construction and column addressing
// ---------------------------------------------------------------------------

fn mixed_table() -> Rc<DataTable> {
    let table = DataTable::new(vec![ColumnType::Float, ColumnType::Integer, ColumnType::String]);
    for i in 0..4 {
        table
            .add(vec![
                Value::Float(i as f64 * 0.5),
                Value::Integer(i * 10),
                Value::from(format!("r{i}")),
            ])
            .unwrap();
    }
    Rc::new(table)
}

#[test]
fn test_non_numeric_column_rejected() {
    let table = mixed_table();
    let err = Convolution::new(table.clone(), None, Mode::Repeat, &[0, 2]).err();
    assert_eq!(
        err,
        Some(FilterError::NonNumericColumn {
            col: 2,
            column_type: ColumnType::String
        })
    );

    // all columns, including the text one
    assert!(matches!(
        Convolution::new(table, None, Mode::Repeat, &[]),
        Err(FilterError::NonNumericColumn { col: 2, .. })
    ));
}

#[test]
fn test_missing_column_rejected() {
    let table = mixed_table();
    assert!(matches!(
        Convolution::new(table, None, Mode::Repeat, &[7]),
        Err(FilterError::ColumnOutOfRange {
            col: 7,
            column_count: 3
        })
    ));
}

#[test]
fn test_columns_sorted_and_indexed() {
    let table = mixed_table();
    let filter = Convolution::new(table, None, Mode::Repeat, &[1, 0, 1]).unwrap();
    assert_eq!(filter.columns(), &[0, 1]);
    assert_eq!(filter.column_count_filtered(), 2);
    assert_eq!(filter.index(1), Some(1));
    assert_eq!(filter.index(2), None);
    assert_eq!(filter.index_original(1), 1);
    assert!(filter.is_column_filtered(0));
    assert!(!filter.is_column_filtered(2));
}

#[test]
fn test_unfiltered_columns_pass_through() {
    let table = mixed_table();
    let filter = Convolution::new(table.clone(), None, Mode::Repeat, &[1]).unwrap();

    assert_eq!(filter.row_count(), 4);
    assert_eq!(filter.column_count(), 3);
    assert_eq!(
        filter.column_types(),
        vec![ColumnType::Float, ColumnType::Float, ColumnType::String]
    );
    assert_eq!(filter.get(0, 1), table.get(0, 1));
    assert_eq!(filter.get(2, 3), Value::from("r3"));
    assert_eq!(filter.get(1, 2), Value::Float(20.0));
    assert_eq!(filter.get(1, 9), Value::Null);
}

#[test]
fn test_set_only_on_filtered_columns() {
    let table = mixed_table();
    let filter = Convolution::new(table, None, Mode::Repeat, &[1]).unwrap();

    assert_eq!(filter.set(0, 0, 1.0), Err(FilterError::ColumnNotFiltered { col: 0 }));
    assert_eq!(
        filter.set(1, 4, 1.0),
        Err(FilterError::RowOutOfRange { row: 4, row_count: 4 })
    );

    filter.set(1, 2, -1.0).unwrap();
    assert_eq!(filter.get(1, 2), Value::Float(-1.0));
}

#[test]
fn test_set_mode_recomputes() {
    let table = Rc::new(DataTable::from_column(&[1.0, 2.0, 3.0]));
    let filter = Convolution::new(table, Some(Kernel::new(vec![1.0, 1.0, 1.0])), Mode::Zero, &[]).unwrap();
    assert_eq!(column(filter.as_ref(), 0), vec![3.0, 6.0, 5.0]);

    filter.set_mode(Mode::Repeat);
    assert_eq!(filter.mode(), Mode::Repeat);
    assert_eq!(column(filter.as_ref(), 0), vec![4.0, 6.0, 8.0]);

    filter.set_mode(Mode::Circular);
    assert_eq!(column(filter.as_ref(), 0), vec![6.0, 6.0, 6.0]);

    filter.set_mode(Mode::Mirror);
    assert_eq!(column(filter.as_ref(), 0), vec![5.0, 6.0, 7.0]);
}
