use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::model::{ColumnType, Value};
use crate::data::source::{ChangeKind, DataChangeEvent, DataListener, DataListeners, DataSource};
use crate::error::{FilterError, Result};

// ---------------------------------------------------------------------------
// Mode – edge handling for rows outside the source
// ---------------------------------------------------------------------------

/// How values are synthesized for row indices outside `0..row_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Missing rows read as NaN.
    Omit,
    /// Missing rows read as `0.0`.
    Zero,
    /// The first or last row is repeated.
    #[default]
    Repeat,
    /// Rows are reflected at each edge, back and forth.
    Mirror,
    /// Rows wrap around modulo the row count.
    Circular,
}

/// Outcome of resolving a possibly out-of-range row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved {
    /// Read this (valid) row from the source.
    Row(usize),
    /// Use this value instead of reading the source.
    Synthetic(f64),
}

impl Mode {
    /// Map `row` onto the source according to this mode.
    ///
    /// Rows inside `0..row_count` always resolve to themselves. On an empty
    /// source the row-mapping modes have nothing to map onto and yield NaN,
    /// and a single-row source mirrors onto its only row.
    pub fn resolve(self, row: i64, row_count: usize) -> Resolved {
        let row_last = row_count as i64 - 1;
        if (0..=row_last).contains(&row) {
            return Resolved::Row(row as usize);
        }

        match self {
            Mode::Omit => Resolved::Synthetic(f64::NAN),
            Mode::Zero => Resolved::Synthetic(0.0),
            _ if row_count == 0 => Resolved::Synthetic(f64::NAN),
            Mode::Repeat => Resolved::Row(row.clamp(0, row_last) as usize),
            Mode::Mirror => {
                if row_last == 0 {
                    return Resolved::Row(0);
                }
                let distance = row.abs();
                let rem = distance / row_last;
                let modulo = distance % row_last;
                let mirrored = if rem % 2 == 0 { modulo } else { row_last - modulo };
                Resolved::Row(mirrored as usize)
            }
            Mode::Circular => {
                let n = row_last + 1;
                let wrapped = if row >= 0 {
                    row % n
                } else {
                    (row + 1) % n + row_last
                };
                Resolved::Row(wrapped as usize)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recomputation hook
// ---------------------------------------------------------------------------

/// Read-only view handed to [`FilterOp::filter`].
pub struct FilterInput<'a> {
    original: &'a dyn DataSource,
    cols: &'a [usize],
    mode: Mode,
}

impl<'a> FilterInput<'a> {
    pub fn original(&self) -> &'a dyn DataSource {
        self.original
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Row count of the upstream source.
    pub fn row_count(&self) -> usize {
        self.original.row_count()
    }

    /// Number of columns the filter produces values for.
    pub fn column_count_filtered(&self) -> usize {
        if self.cols.is_empty() {
            self.original.column_count()
        } else {
            self.cols.len()
        }
    }

    /// Upstream column index of the `index`-th filtered column.
    pub fn index_original(&self, index: usize) -> usize {
        if self.cols.is_empty() {
            index
        } else {
            self.cols[index]
        }
    }

    /// Upstream value at (`col`, `row`), with `row` resolved by the edge mode.
    /// Non-numeric cells read as NaN.
    pub fn get_original(&self, col: usize, row: i64) -> f64 {
        match self.mode.resolve(row, self.original.row_count()) {
            Resolved::Row(row) => self.original.get(col, row).to_f64_or_nan(),
            Resolved::Synthetic(v) => v,
        }
    }
}

/// The filtered rows a filter serves reads from.
#[derive(Debug, Default)]
pub struct RowBuffer {
    rows: Vec<Vec<f64>>,
}

impl RowBuffer {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn add(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn get(&self, row: usize, index: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(index)).copied()
    }

    fn get_mut(&mut self, row: usize, index: usize) -> Option<&mut f64> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(index))
    }
}

/// The algorithm behind a [`Filter`].
///
/// `filter` receives an empty buffer and must add one row per output row.
/// It runs to completion on every upstream change.
pub trait FilterOp {
    fn filter(&self, input: &FilterInput<'_>, rows: &mut RowBuffer);

    /// `(columns, rows)` of the filter output.
    fn output_size(&self, original: &dyn DataSource) -> (usize, usize) {
        (original.column_count(), original.row_count())
    }

    /// When true, reads bypass the buffer and go straight to the source.
    fn passes_through(&self, _original: &dyn DataSource) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Filter – cached derived source
// ---------------------------------------------------------------------------

struct Cache {
    mode: Mode,
    rows: RowBuffer,
}

/// A data source computed from another source and kept up to date.
///
/// The filter listens to its upstream source. Every change there rebuilds
/// the whole buffer synchronously and is then re-broadcast to the filter's
/// own listeners, so chained filters update upstream to downstream.
///
/// Columns that are not filtered read straight through to the upstream
/// source.
pub struct Filter<F> {
    original: Rc<dyn DataSource>,
    cols: Vec<usize>,
    op: RefCell<F>,
    cache: RefCell<Cache>,
    listeners: DataListeners,
}

impl<F: FilterOp + 'static> Filter<F> {
    /// Wrap `original`, filtering `cols` (all columns when empty) with `op`.
    ///
    /// Every filtered column must exist and be numeric. The buffer is filled
    /// before this returns and the filter is registered on `original`.
    pub fn with_op(original: Rc<dyn DataSource>, op: F, mode: Mode, cols: &[usize]) -> Result<Rc<Self>> {
        let mut cols = cols.to_vec();
        cols.sort_unstable();
        cols.dedup();

        let column_count = original.column_count();
        let types = original.column_types();
        let checked: Vec<usize> = if cols.is_empty() {
            (0..column_count).collect()
        } else {
            cols.clone()
        };
        for col in checked {
            let column_type = *types
                .get(col)
                .ok_or(FilterError::ColumnOutOfRange { col, column_count })?;
            if !column_type.is_numeric() {
                return Err(FilterError::NonNumericColumn { col, column_type });
            }
        }

        let filter = Rc::new(Filter {
            original,
            cols,
            op: RefCell::new(op),
            cache: RefCell::new(Cache {
                mode,
                rows: RowBuffer::default(),
            }),
            listeners: DataListeners::new(),
        });
        filter.refilter();

        let listener: Weak<dyn DataListener> = Rc::downgrade(&filter) as Weak<dyn DataListener>;
        filter.original.add_data_listener(listener);
        Ok(filter)
    }

    /// Stop listening to the upstream source.
    pub fn detach(self: &Rc<Self>) {
        let listener: Weak<dyn DataListener> = Rc::downgrade(self) as Weak<dyn DataListener>;
        self.original.remove_data_listener(&listener);
    }

    pub fn original(&self) -> &Rc<dyn DataSource> {
        &self.original
    }

    /// Filtered upstream columns, sorted; empty means every column.
    pub fn columns(&self) -> &[usize] {
        &self.cols
    }

    pub fn mode(&self) -> Mode {
        self.cache.borrow().mode
    }

    pub fn set_mode(&self, mode: Mode) {
        self.cache.borrow_mut().mode = mode;
        self.changed(ChangeKind::Updated, &[]);
    }

    /// Position of `col` among the filtered columns, `None` if it passes through.
    pub fn index(&self, col: usize) -> Option<usize> {
        if self.cols.is_empty() {
            Some(col)
        } else {
            self.cols.binary_search(&col).ok()
        }
    }

    /// Upstream column of the `index`-th filtered column.
    pub fn index_original(&self, index: usize) -> usize {
        if self.cols.is_empty() {
            index
        } else {
            self.cols[index]
        }
    }

    pub fn is_column_filtered(&self, col: usize) -> bool {
        self.index(col).is_some()
    }

    pub fn column_count_filtered(&self) -> usize {
        if self.cols.is_empty() {
            self.op.borrow().output_size(self.original.as_ref()).0
        } else {
            self.cols.len()
        }
    }

    /// Overwrite one buffered value and notify listeners.
    ///
    /// Only filtered columns can be written. The value is replaced again by
    /// the next recomputation.
    pub fn set(&self, col: usize, row: usize, value: f64) -> Result<()> {
        let index = self.index(col).ok_or(FilterError::ColumnNotFiltered { col })?;
        let old = {
            let mut cache = self.cache.borrow_mut();
            let row_count = cache.rows.len();
            let cell = cache
                .rows
                .get_mut(row, index)
                .ok_or(FilterError::RowOutOfRange { row, row_count })?;
            std::mem::replace(cell, value)
        };

        let event = DataChangeEvent::new(col, row, Value::Float(old), Value::Float(value));
        self.listeners.notify(self, ChangeKind::Updated, &[event]);
        Ok(())
    }

    /// The filter's algorithm and its parameters.
    pub fn op(&self) -> Ref<'_, F> {
        self.op.borrow()
    }

    /// Change the algorithm's parameters, then recompute and notify.
    pub(crate) fn update_op<T>(&self, update: impl FnOnce(&mut F) -> T) -> T {
        let result = update(&mut self.op.borrow_mut());
        self.changed(ChangeKind::Updated, &[]);
        result
    }

    fn changed(&self, kind: ChangeKind, events: &[DataChangeEvent]) {
        self.refilter();
        self.listeners.notify(self, kind, events);
    }

    /// Rebuild the buffer from scratch.
    fn refilter(&self) {
        let op = self.op.borrow();
        let mut cache = self.cache.borrow_mut();
        let input = FilterInput {
            original: self.original.as_ref(),
            cols: &self.cols,
            mode: cache.mode,
        };

        let mut rows = std::mem::take(&mut cache.rows);
        rows.clear();
        op.filter(&input, &mut rows);

        let (out_cols, out_rows) = op.output_size(self.original.as_ref());
        debug_assert!(
            op.passes_through(self.original.as_ref()) || rows.len() == out_rows,
            "filter produced {} rows, expected {out_rows}",
            rows.len()
        );
        debug!(
            "recomputed {} rows x {} filtered columns (output {out_cols}x{out_rows})",
            rows.len(),
            input.column_count_filtered()
        );
        cache.rows = rows;
    }
}

impl<F: FilterOp + 'static> DataSource for Filter<F> {
    fn get(&self, col: usize, row: usize) -> Value {
        if self.op.borrow().passes_through(self.original.as_ref()) {
            return self.original.get(col, row);
        }
        match self.index(col) {
            None => self.original.get(col, row),
            Some(index) => self
                .cache
                .borrow()
                .rows
                .get(row, index)
                .map_or(Value::Null, Value::Float),
        }
    }

    fn row_count(&self) -> usize {
        self.op.borrow().output_size(self.original.as_ref()).1
    }

    fn column_count(&self) -> usize {
        self.op.borrow().output_size(self.original.as_ref()).0
    }

    fn column_types(&self) -> Vec<ColumnType> {
        let op = self.op.borrow();
        let original_types = self.original.column_types();
        if op.passes_through(self.original.as_ref()) {
            return original_types;
        }
        let (cols, _) = op.output_size(self.original.as_ref());
        (0..cols)
            .map(|col| match self.index(col) {
                Some(_) => ColumnType::Float,
                None => original_types.get(col).copied().unwrap_or(ColumnType::Float),
            })
            .collect()
    }

    fn add_data_listener(&self, listener: Weak<dyn DataListener>) {
        self.listeners.add(listener);
    }

    fn remove_data_listener(&self, listener: &Weak<dyn DataListener>) {
        self.listeners.remove(listener);
    }
}

impl<F: FilterOp + 'static> DataListener for Filter<F> {
    fn data_added(&self, _source: &dyn DataSource, events: &[DataChangeEvent]) {
        self.changed(ChangeKind::Added, events);
    }

    fn data_updated(&self, _source: &dyn DataSource, events: &[DataChangeEvent]) {
        self.changed(ChangeKind::Updated, events);
    }

    fn data_removed(&self, _source: &dyn DataSource, events: &[DataChangeEvent]) {
        self.changed(ChangeKind::Removed, events);
    }
}
