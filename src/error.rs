use thiserror::Error;

use crate::data::model::{ColumnType, Value};

/// Errors raised synchronously by tables and filters.
///
/// Non-finite numbers are data, not errors: they flow through the filters
/// and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("column {col} is not numeric (type {column_type})")]
    NonNumericColumn { col: usize, column_type: ColumnType },

    #[error("column {col} is not filtered")]
    ColumnNotFiltered { col: usize },

    #[error("column {col} is out of range, source has {column_count} columns")]
    ColumnOutOfRange { col: usize, column_count: usize },

    #[error("row {row} is out of range, source has {row_count} rows")]
    RowOutOfRange { row: usize, row_count: usize },

    #[error("row has {got} values, expected {expected}")]
    RowLength { expected: usize, got: usize },

    #[error("value {value:?} does not fit column {col} of type {column_type}")]
    TypeMismatch {
        col: usize,
        column_type: ColumnType,
        value: Value,
    },

    #[error("median window size must be at least 1")]
    InvalidWindowSize,

    #[error("median window offset {offset} exceeds {max}")]
    InvalidWindowOffset { offset: usize, max: usize },

    #[error("kernel of {size} coefficients exceeds {max}")]
    KernelTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;
