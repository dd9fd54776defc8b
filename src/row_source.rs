/// Row source - a live ordered sequence of rows
///
/// The row source is the source of truth the filter core observes. It owns the
/// rows (as `Rc<R>`, never mutated in place) and delivers every insert, removal
/// and replacement to its registered views.
///
/// # Delivery
///
/// Every mutation updates storage first, then enqueues its `RowChange` in the
/// pending changeset. If no delivery is running, the queue is drained and each
/// change is handed to every live view before the next change is looked at.
/// A view (or a listener downstream of one) that mutates the source while a
/// change is being delivered only enqueues; the running delivery loop picks
/// the new change up afterwards. Changes therefore reach views exactly once,
/// in the order they were made, and no view is ever re-entered.
///
/// Work that reads the rows as a whole (registering a view, rebuilding one)
/// goes through `when_idle`. While changes are still queued the stored rows
/// are ahead of what the views have seen, so such work waits until the queue
/// is drained.
///
/// # Examples
///
/// ```
/// use tablefilter::RowSource;
///
/// let rows = RowSource::from_rows(vec!["Widget", "Gadget"]);
/// rows.push("Doohickey");
/// rows.set(0, "Sprocket").unwrap();
///
/// assert_eq!(rows.len(), 3);
/// assert_eq!(*rows.get(0).unwrap(), "Sprocket");
/// assert!(rows.remove(7).is_err());
/// ```

use crate::changeset::{Changeset, IncrementalView, RowChange};
use crate::error::FilterError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type IdleTask<R> = Box<dyn FnOnce(&RowSource<R>)>;

pub struct RowSource<R> {
    rows: RefCell<Vec<Rc<R>>>,
    /// Changes waiting to be delivered
    pending: RefCell<Changeset<R>>,
    delivering: Cell<bool>,
    /// Run once every queued change has reached every view
    idle_tasks: RefCell<VecDeque<IdleTask<R>>>,
    views: RefCell<Vec<Weak<dyn IncrementalView<R>>>>,
}

/// Clears the delivery flag even if a view panics mid-delivery
struct DeliveryGuard<'a>(&'a Cell<bool>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<R: 'static> Default for RowSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: 'static> RowSource<R> {
    pub fn new() -> Self {
        RowSource {
            rows: RefCell::new(Vec::new()),
            pending: RefCell::new(Changeset::new()),
            delivering: Cell::new(false),
            idle_tasks: RefCell::new(VecDeque::new()),
            views: RefCell::new(Vec::new()),
        }
    }

    /// Create a source pre-filled with `rows`.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let source = Self::new();
        source.rows.borrow_mut().extend(rows.into_iter().map(Rc::new));
        source
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<R>> {
        self.rows.borrow().get(index).cloned()
    }

    /// Snapshot of all rows in order
    pub fn rows(&self) -> Vec<Rc<R>> {
        self.rows.borrow().clone()
    }

    /// Returns the current changeset generation number
    pub fn generation(&self) -> u64 {
        self.pending.borrow().generation()
    }

    /// Returns true if changes are waiting to be delivered
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Register a view. It is rebuilt from the current rows and receives
    /// every later change until it is dropped. During a delivery both happen
    /// once the queue is drained.
    pub fn register_view(&self, view: Weak<dyn IncrementalView<R>>) {
        self.when_idle(move |source| {
            if let Some(live) = view.upgrade() {
                live.rebuild(&source.rows(), source.generation());
            }
            source.views.borrow_mut().push(view);
        });
    }

    /// Run `task` as soon as no change is waiting to be delivered: right away
    /// when the source is idle, otherwise after the running delivery has
    /// handed every queued change to every view. Tasks run in the order they
    /// were scheduled.
    pub fn when_idle<F>(&self, task: F)
    where
        F: FnOnce(&RowSource<R>) + 'static,
    {
        self.idle_tasks.borrow_mut().push_back(Box::new(task));
        self.deliver();
    }

    /// Number of registered views still alive
    pub fn view_count(&self) -> usize {
        self.views
            .borrow()
            .iter()
            .filter(|view| view.strong_count() > 0)
            .count()
    }

    pub fn push(&self, row: R) {
        let row = Rc::new(row);
        let index = {
            let mut rows = self.rows.borrow_mut();
            rows.push(Rc::clone(&row));
            rows.len() - 1
        };
        self.record(RowChange::Inserted { index, row });
        self.deliver();
    }

    pub fn extend<I>(&self, rows: I)
    where
        I: IntoIterator<Item = R>,
    {
        for row in rows {
            let row = Rc::new(row);
            let index = {
                let mut stored = self.rows.borrow_mut();
                stored.push(Rc::clone(&row));
                stored.len() - 1
            };
            self.record(RowChange::Inserted { index, row });
        }
        self.deliver();
    }

    pub fn insert(&self, index: usize, row: R) -> Result<(), FilterError> {
        let row = Rc::new(row);
        {
            let mut rows = self.rows.borrow_mut();
            if index > rows.len() {
                return Err(FilterError::IndexOutOfRange { index, len: rows.len() });
            }
            rows.insert(index, Rc::clone(&row));
        }
        self.record(RowChange::Inserted { index, row });
        self.deliver();
        Ok(())
    }

    pub fn remove(&self, index: usize) -> Result<Rc<R>, FilterError> {
        let row = self.remove_silently(index)?;
        self.deliver();
        Ok(row)
    }

    /// Replace the row at `index`, returning the previous row.
    pub fn set(&self, index: usize, row: R) -> Result<Rc<R>, FilterError> {
        let new = Rc::new(row);
        let old = {
            let mut rows = self.rows.borrow_mut();
            let len = rows.len();
            let slot = rows
                .get_mut(index)
                .ok_or(FilterError::IndexOutOfRange { index, len })?;
            std::mem::replace(slot, Rc::clone(&new))
        };
        self.record(RowChange::Replaced {
            index,
            old: Rc::clone(&old),
            new,
        });
        self.deliver();
        Ok(old)
    }

    /// Replace the row at `index` with `f(current)`, returning the previous row.
    pub fn update<F>(&self, index: usize, f: F) -> Result<Rc<R>, FilterError>
    where
        F: FnOnce(&R) -> R,
    {
        let current = self.get(index).ok_or(FilterError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        self.set(index, f(&current))
    }

    /// Remove every row for which `keep` returns false.
    pub fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&R) -> bool,
    {
        let doomed: Vec<usize> = self
            .rows
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, row)| !keep(row))
            .map(|(index, _)| index)
            .collect();

        // Back to front so earlier indices stay valid
        for index in doomed.into_iter().rev() {
            if self.remove_silently(index).is_err() {
                break;
            }
        }
        self.deliver();
    }

    pub fn clear(&self) {
        let len = self.len();
        for index in (0..len).rev() {
            if self.remove_silently(index).is_err() {
                break;
            }
        }
        self.deliver();
    }

    fn remove_silently(&self, index: usize) -> Result<Rc<R>, FilterError> {
        let row = {
            let mut rows = self.rows.borrow_mut();
            if index >= rows.len() {
                return Err(FilterError::IndexOutOfRange { index, len: rows.len() });
            }
            rows.remove(index)
        };
        self.record(RowChange::Removed {
            index,
            row: Rc::clone(&row),
        });
        Ok(row)
    }

    fn record(&self, change: RowChange<R>) {
        self.pending.borrow_mut().push(change);
    }

    /// Drain pending changes into the views, one change at a time. Idle
    /// tasks run only between batches, when nothing is queued.
    fn deliver(&self) {
        if self.delivering.get() {
            return;
        }
        self.delivering.set(true);
        let _guard = DeliveryGuard(&self.delivering);

        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                if pending.is_empty() {
                    None
                } else {
                    let batch = pending.drain();
                    Some((batch, pending.generation()))
                }
            };

            let Some((batch, generation)) = next else {
                let task = self.idle_tasks.borrow_mut().pop_front();
                match task {
                    Some(task) => {
                        task(self);
                        continue;
                    }
                    None => break,
                }
            };

            for change in &batch {
                self.views.borrow_mut().retain(|view| view.strong_count() > 0);
                let views: Vec<Rc<dyn IncrementalView<R>>> = self
                    .views
                    .borrow()
                    .iter()
                    .filter_map(Weak::upgrade)
                    .collect();
                for view in views {
                    view.apply_changes(std::slice::from_ref(change), generation);
                }
            }
        }
    }
}
