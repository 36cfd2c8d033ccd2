use std::fmt;
use std::rc::Rc;

use super::source::DataSource;
use super::table::DataTable;

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric view of the cell, `NaN` for anything that is not a number.
    pub fn to_f64_or_nan(&self) -> f64 {
        self.as_f64().unwrap_or(f64::NAN)
    }

    /// The column type this value naturally belongs to (`None` for `Null`).
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ColumnType::Bool),
            Value::Integer(_) => Some(ColumnType::Integer),
            Value::Float(_) => Some(ColumnType::Float),
            Value::String(_) => Some(ColumnType::String),
        }
    }

    /// Convert the value so it fits a column of type `ty`.
    ///
    /// `Null` fits everywhere and integers widen into float columns.
    /// Returns `None` when the value cannot be stored in such a column.
    pub fn coerce_to(self, ty: ColumnType) -> Option<Value> {
        match (self, ty) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Integer(i), ColumnType::Float) => Some(Value::Float(i as f64)),
            (v, ty) if v.column_type() == Some(ty) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – per-column type tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    Integer,
    Float,
    String,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Derive a column type from the values of a column.
    ///
    /// Nulls are ignored, a mix of integers and floats widens to `Float`,
    /// any other mix falls back to `String`. An all-null column is `Float`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
        let mut inferred: Option<ColumnType> = None;
        for ty in values.into_iter().filter_map(Value::column_type) {
            inferred = Some(match (inferred, ty) {
                (None, ty) => ty,
                (Some(a), b) if a == b => a,
                (Some(a), b) if a.is_numeric() && b.is_numeric() => ColumnType::Float,
                _ => return ColumnType::String,
            });
        }
        inferred.unwrap_or(ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Bool => "bool",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Dataset – a loaded table together with its column names
// ---------------------------------------------------------------------------

/// A table read from a file, with the column names from its header.
#[derive(Clone)]
pub struct Dataset {
    /// Ordered column names, one per table column.
    pub column_names: Vec<String>,
    /// The rows, shared so filters can observe later edits.
    pub table: Rc<DataTable>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.row_count()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
