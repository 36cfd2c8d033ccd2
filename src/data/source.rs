use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

use super::model::{ColumnType, Value};

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// One changed cell: its position plus the value before and after.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChangeEvent {
    pub col: usize,
    pub row: usize,
    pub old: Value,
    pub new: Value,
}

impl DataChangeEvent {
    pub fn new(col: usize, row: usize, old: Value, new: Value) -> Self {
        DataChangeEvent { col, row, old, new }
    }
}

/// Which listener callback a notification goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

// ---------------------------------------------------------------------------
// DataSource / DataListener
// ---------------------------------------------------------------------------

/// Row/column access to a table of values.
///
/// Filters both consume and implement this trait, so they can be chained.
/// Reads outside the table return `Value::Null`.
pub trait DataSource {
    fn get(&self, col: usize, row: usize) -> Value;

    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn column_types(&self) -> Vec<ColumnType>;

    fn is_column_numeric(&self, col: usize) -> bool {
        self.column_types()
            .get(col)
            .is_some_and(|ty| ty.is_numeric())
    }

    /// Register a listener. Only a weak handle is kept: a dropped listener
    /// simply stops receiving events.
    fn add_data_listener(&self, listener: Weak<dyn DataListener>);

    fn remove_data_listener(&self, listener: &Weak<dyn DataListener>);
}

/// Receives change notifications from a [`DataSource`].
///
/// Callbacks run synchronously on the thread that mutated the source, after
/// the mutation is complete, so reading back from `source` is allowed.
pub trait DataListener {
    fn data_added(&self, source: &dyn DataSource, events: &[DataChangeEvent]);

    fn data_updated(&self, source: &dyn DataSource, events: &[DataChangeEvent]);

    fn data_removed(&self, source: &dyn DataSource, events: &[DataChangeEvent]);
}

// ---------------------------------------------------------------------------
// DataListeners – subscription list shared by all sources
// ---------------------------------------------------------------------------

/// The listeners registered on one source, in registration order.
#[derive(Default)]
pub struct DataListeners {
    listeners: RefCell<Vec<Weak<dyn DataListener>>>,
}

impl DataListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Weak<dyn DataListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn remove(&self, listener: &Weak<dyn DataListener>) {
        self.listeners
            .borrow_mut()
            .retain(|registered| !registered.ptr_eq(listener));
    }

    /// Number of listeners that are still alive.
    pub fn len(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `events` to every live listener, in order.
    ///
    /// The list is snapshotted first, so listeners may register or remove
    /// listeners on this source while being notified.
    pub fn notify(&self, source: &dyn DataSource, kind: ChangeKind, events: &[DataChangeEvent]) {
        let live: Vec<Rc<dyn DataListener>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        trace!(
            "delivering {kind:?} ({} events) to {} listeners",
            events.len(),
            live.len()
        );

        for listener in live {
            match kind {
                ChangeKind::Added => listener.data_added(source, events),
                ChangeKind::Updated => listener.data_updated(source, events),
                ChangeKind::Removed => listener.data_removed(source, events),
            }
        }
    }
}
