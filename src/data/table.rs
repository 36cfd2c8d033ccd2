use std::cell::RefCell;
use std::rc::Weak;

use super::model::{ColumnType, Value};
use super::source::{ChangeKind, DataChangeEvent, DataListener, DataListeners, DataSource};
use crate::error::{FilterError, Result};

// ---------------------------------------------------------------------------
// DataTable – in-memory, typed row store
// ---------------------------------------------------------------------------

/// A mutable table with a fixed set of typed columns.
///
/// Every mutation is validated first, applied, and then announced to the
/// registered listeners. The row borrow is released before listeners run so
/// they can read the new state back.
pub struct DataTable {
    types: Vec<ColumnType>,
    rows: RefCell<Vec<Vec<Value>>>,
    listeners: DataListeners,
}

impl DataTable {
    /// An empty table with the given column types.
    pub fn new(types: Vec<ColumnType>) -> Self {
        DataTable {
            types,
            rows: RefCell::new(Vec::new()),
            listeners: DataListeners::new(),
        }
    }

    /// Build a table of float columns from row-major data.
    pub fn from_rows(columns: usize, rows: &[Vec<f64>]) -> Result<Self> {
        let table = DataTable::new(vec![ColumnType::Float; columns]);
        for row in rows {
            table.push_row(row.iter().map(|&v| Value::Float(v)).collect())?;
        }
        Ok(table)
    }

    /// Build a single float column table.
    pub fn from_column(values: &[f64]) -> Self {
        let table = DataTable::new(vec![ColumnType::Float]);
        table
            .rows
            .borrow_mut()
            .extend(values.iter().map(|&v| vec![Value::Float(v)]));
        table
    }

    /// Append a row and notify listeners. Returns the index of the new row.
    pub fn add(&self, row: Vec<Value>) -> Result<usize> {
        let index = self.push_row(row)?;
        let events: Vec<DataChangeEvent> = {
            let rows = self.rows.borrow();
            rows[index]
                .iter()
                .enumerate()
                .map(|(col, v)| DataChangeEvent::new(col, index, Value::Null, v.clone()))
                .collect()
        };
        self.listeners.notify(self, ChangeKind::Added, &events);
        Ok(index)
    }

    /// Replace one cell and notify listeners. Returns the previous value.
    pub fn set(&self, col: usize, row: usize, value: impl Into<Value>) -> Result<Value> {
        let column_type = self.column_type(col)?;
        let value = coerce(col, column_type, value.into())?;

        let old = {
            let mut rows = self.rows.borrow_mut();
            let row_count = rows.len();
            let cells = rows
                .get_mut(row)
                .ok_or(FilterError::RowOutOfRange { row, row_count })?;
            std::mem::replace(&mut cells[col], value.clone())
        };

        let event = DataChangeEvent::new(col, row, old.clone(), value);
        self.listeners.notify(self, ChangeKind::Updated, &[event]);
        Ok(old)
    }

    /// Remove a row and notify listeners. Returns the removed values.
    pub fn remove(&self, row: usize) -> Result<Vec<Value>> {
        let removed = {
            let mut rows = self.rows.borrow_mut();
            let row_count = rows.len();
            if row >= row_count {
                return Err(FilterError::RowOutOfRange { row, row_count });
            }
            rows.remove(row)
        };

        let events: Vec<DataChangeEvent> = removed
            .iter()
            .enumerate()
            .map(|(col, v)| DataChangeEvent::new(col, row, v.clone(), Value::Null))
            .collect();
        self.listeners.notify(self, ChangeKind::Removed, &events);
        Ok(removed)
    }

    /// Remove every row, announcing it as a single removal.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.rows.borrow_mut());
        if removed.is_empty() {
            return;
        }
        let events: Vec<DataChangeEvent> = removed
            .into_iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(move |(col, v)| DataChangeEvent::new(col, row, v, Value::Null))
            })
            .collect();
        self.listeners.notify(self, ChangeKind::Removed, &events);
    }

    /// Append a row without notifying anyone; used while bulk loading.
    pub(crate) fn push_row(&self, row: Vec<Value>) -> Result<usize> {
        if row.len() != self.types.len() {
            return Err(FilterError::RowLength {
                expected: self.types.len(),
                got: row.len(),
            });
        }
        let row = row
            .into_iter()
            .zip(&self.types)
            .enumerate()
            .map(|(col, (value, &ty))| coerce(col, ty, value))
            .collect::<Result<Vec<Value>>>()?;

        let mut rows = self.rows.borrow_mut();
        rows.push(row);
        Ok(rows.len() - 1)
    }

    fn column_type(&self, col: usize) -> Result<ColumnType> {
        self.types
            .get(col)
            .copied()
            .ok_or(FilterError::ColumnOutOfRange {
                col,
                column_count: self.types.len(),
            })
    }
}

fn coerce(col: usize, column_type: ColumnType, value: Value) -> Result<Value> {
    value
        .clone()
        .coerce_to(column_type)
        .ok_or(FilterError::TypeMismatch {
            col,
            column_type,
            value,
        })
}

impl DataSource for DataTable {
    fn get(&self, col: usize, row: usize) -> Value {
        self.rows
            .borrow()
            .get(row)
            .and_then(|cells| cells.get(col))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    fn column_count(&self) -> usize {
        self.types.len()
    }

    fn column_types(&self) -> Vec<ColumnType> {
        self.types.clone()
    }

    fn add_data_listener(&self, listener: Weak<dyn DataListener>) {
        self.listeners.add(listener);
    }

    fn remove_data_listener(&self, listener: &Weak<dyn DataListener>) {
        self.listeners.remove(listener);
    }
}
