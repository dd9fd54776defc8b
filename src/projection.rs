/// Distinct-mapping projection
///
/// A `DistinctMapping` maps every row of a `RowSource` through a function and
/// keeps exactly one derived element per distinct mapped value, no matter how
/// many rows produce it.
///
/// # Design
///
/// - A `HashMap<D, usize>` holds the retained instance of each distinct value
///   as its key, and the number of rows currently mapping to it as its value
/// - A `Vec<D>` keeps the retained instances in first-observed order
/// - Row changes adjust the counts incrementally: an insert bumps a count (or
///   adds a new entry), a removal drops one (and removes the entry at zero)
///
/// # Retention
///
/// The instance created for the first occurrence of a value is the one kept.
/// Later rows mapping to an equal value only bump its count, and their freshly
/// mapped instances are discarded. This is what keeps per-value state (such as
/// a selection flag) stable while rows come and go.
///
/// # Caller obligation
///
/// The mapping function must be pure with respect to equality: mapping the
/// same row twice must yield equal values, and `Eq`/`Hash` on `D` must agree.
/// Otherwise removals cannot find what inserts added and deduplication is
/// undefined. This is not checked at runtime.
///
/// # Examples
///
/// ```
/// use tablefilter::{DistinctMapping, RowSource};
///
/// let source = RowSource::from_rows(vec!["a", "b", "a"]);
/// let distinct = DistinctMapping::project(&source, |row: &&str| row.to_uppercase());
///
/// assert_eq!(distinct.items(), vec!["A".to_string(), "B".to_string()]);
///
/// source.remove(1).unwrap();
/// assert_eq!(distinct.items(), vec!["A".to_string()]);
/// ```

use crate::changeset::{IncrementalView, RowChange};
use crate::observer::{Listeners, SubscriptionId};
use crate::row_source::RowSource;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// A change to the set of distinct values
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionChange<D> {
    /// A value was observed for the first time
    Added(D),
    /// The last row holding a value went away
    Removed(D),
}

struct DistinctState<D> {
    /// Retained instance -> occurrence count
    counts: HashMap<D, usize>,
    /// Retained instances in first-observed order
    order: Vec<D>,
}

impl<D: Eq + Hash + Clone> DistinctState<D> {
    fn new() -> Self {
        DistinctState {
            counts: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn add_occurrence(&mut self, derived: D, events: &mut Vec<ProjectionChange<D>>) {
        if let Some(count) = self.counts.get_mut(&derived) {
            *count += 1;
            return;
        }
        self.counts.insert(derived.clone(), 1);
        self.order.push(derived.clone());
        events.push(ProjectionChange::Added(derived));
    }

    fn remove_occurrence(&mut self, derived: &D, events: &mut Vec<ProjectionChange<D>>) {
        let Some(count) = self.counts.get_mut(derived) else {
            log::warn!(
                "distinct projection: removed a value that was never observed, mapping is not pure"
            );
            return;
        };
        *count -= 1;
        if *count > 0 {
            return;
        }
        if let Some((retained, _)) = self.counts.remove_entry(derived) {
            if let Some(pos) = self.order.iter().position(|d| *d == retained) {
                self.order.remove(pos);
            }
            events.push(ProjectionChange::Removed(retained));
        }
    }
}

/// Live collection of one derived element per distinct mapped value.
pub struct DistinctMapping<R, D> {
    map: Box<dyn Fn(&R) -> D>,
    state: RefCell<DistinctState<D>>,
    listeners: Listeners<dyn Fn(&ProjectionChange<D>)>,
    last_synced_generation: Cell<u64>,
}

impl<R: 'static, D: Eq + Hash + Clone + 'static> DistinctMapping<R, D> {
    /// Project `source` through `map` and keep the result up to date.
    ///
    /// The projection registers itself with the source as a weakly held view;
    /// it stops receiving changes once the returned `Rc` is dropped.
    pub fn project<F>(source: &RowSource<R>, map: F) -> Rc<Self>
    where
        F: Fn(&R) -> D + 'static,
    {
        let projection = Rc::new(DistinctMapping {
            map: Box::new(map),
            state: RefCell::new(DistinctState::new()),
            listeners: Listeners::new(),
            last_synced_generation: Cell::new(0),
        });
        let view: Weak<dyn IncrementalView<R>> =
            Rc::downgrade(&projection) as Weak<dyn IncrementalView<R>>;
        source.register_view(view);
        projection
    }
}

impl<R, D: Eq + Hash + Clone> DistinctMapping<R, D> {
    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.state.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().order.is_empty()
    }

    /// Retained instances in first-observed order
    pub fn items(&self) -> Vec<D> {
        self.state.borrow().order.clone()
    }

    pub fn contains(&self, derived: &D) -> bool {
        self.state.borrow().counts.contains_key(derived)
    }

    /// Returns the retained instance equal to `derived`
    pub fn get(&self, derived: &D) -> Option<D> {
        self.state
            .borrow()
            .counts
            .get_key_value(derived)
            .map(|(retained, _)| retained.clone())
    }

    /// Number of source rows currently mapping to `derived`
    pub fn occurrences(&self, derived: &D) -> usize {
        self.state.borrow().counts.get(derived).copied().unwrap_or(0)
    }

    /// First retained instance, in first-observed order, matching `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<D>
    where
        P: FnMut(&D) -> bool,
    {
        self.state.borrow().order.iter().find(|d| predicate(d)).cloned()
    }

    /// Register a listener for distinct values appearing and disappearing.
    ///
    /// Listeners run after the projection is consistent and outside of any
    /// internal borrow, so they may read the projection or mutate the source.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ProjectionChange<D>) + 'static,
    {
        self.listeners.add(Rc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn notify(&self, events: Vec<ProjectionChange<D>>) {
        if events.is_empty() {
            return;
        }
        let listeners = self.listeners.snapshot();
        for event in &events {
            for listener in &listeners {
                listener(event);
            }
        }
    }
}

impl<R: 'static, D: Eq + Hash + Clone + 'static> IncrementalView<R> for DistinctMapping<R, D> {
    fn apply_changes(&self, changes: &[RowChange<R>], generation: u64) -> bool {
        let mut events = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            for change in changes {
                match change {
                    RowChange::Inserted { row, .. } => {
                        state.add_occurrence((self.map)(row), &mut events);
                    }
                    RowChange::Removed { row, .. } => {
                        state.remove_occurrence(&(self.map)(row), &mut events);
                    }
                    RowChange::Replaced { old, new, .. } => {
                        let old_derived = (self.map)(old);
                        let new_derived = (self.map)(new);
                        if old_derived != new_derived {
                            state.remove_occurrence(&old_derived, &mut events);
                            state.add_occurrence(new_derived, &mut events);
                        }
                    }
                }
            }
            log::trace!(
                "distinct projection: {} change(s) applied, {} distinct value(s)",
                changes.len(),
                state.order.len()
            );
        }
        self.last_synced_generation.set(generation);

        let modified = !events.is_empty();
        self.notify(events);
        modified
    }

    fn last_synced_generation(&self) -> u64 {
        self.last_synced_generation.get()
    }

    fn rebuild(&self, rows: &[Rc<R>], generation: u64) {
        let mut events = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            let previous = std::mem::replace(&mut *state, DistinctState::new());

            for row in rows {
                let derived = (self.map)(row);
                if let Some(count) = state.counts.get_mut(&derived) {
                    *count += 1;
                    continue;
                }
                // Values that survive the rebuild keep their retained instance
                let retained = previous
                    .counts
                    .get_key_value(&derived)
                    .map(|(existing, _)| existing.clone())
                    .unwrap_or(derived);
                state.counts.insert(retained.clone(), 1);
                state.order.push(retained);
            }

            for old in &previous.order {
                if !state.counts.contains_key(old) {
                    events.push(ProjectionChange::Removed(old.clone()));
                }
            }
            for new in &state.order {
                if !previous.counts.contains_key(new) {
                    events.push(ProjectionChange::Added(new.clone()));
                }
            }
        }
        self.last_synced_generation.set(generation);
        self.notify(events);
    }
}
