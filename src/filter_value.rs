/// Filter values
///
/// A `FilterValue` pairs one distinct column value with an inclusion flag.
/// It is a shared handle: clones point at the same flag, so a checkbox, a
/// reset action and the table filter all see one state.
///
/// Equality, hashing and ordering look at the wrapped value only. Two handles
/// wrapping equal values are equal even when their flags differ, which is
/// what lets the distinct projection deduplicate freshly mapped values against
/// the retained ones.

use crate::observer::{Listeners, SubscriptionId};
use crate::value::ColumnValue;
use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

type SelectionObserver = dyn Fn(&FilterValue, bool);

struct Inner {
    value: ColumnValue,
    selected: Cell<bool>,
    observers: Listeners<SelectionObserver>,
}

#[derive(Clone)]
pub struct FilterValue {
    inner: Rc<Inner>,
}

impl FilterValue {
    /// New filter values start out selected.
    pub fn new(value: ColumnValue) -> Self {
        FilterValue {
            inner: Rc::new(Inner {
                value,
                selected: Cell::new(true),
                observers: Listeners::new(),
            }),
        }
    }

    pub fn value(&self) -> &ColumnValue {
        &self.inner.value
    }

    pub fn is_selected(&self) -> bool {
        self.inner.selected.get()
    }

    /// Set the inclusion flag and notify observers if it changed.
    pub fn set_selected(&self, selected: bool) {
        if self.inner.selected.replace(selected) == selected {
            return;
        }
        log::debug!("FilterValue {} set to {}", self, selected);
        for observer in self.inner.observers.snapshot() {
            observer(self, selected);
        }
    }

    pub fn toggle(&self) {
        self.set_selected(!self.is_selected());
    }

    /// Register a callback run on every selection change.
    ///
    /// The callback receives the handle and the new flag. A callback that
    /// captures a clone of this same handle keeps it alive for as long as it
    /// stays registered.
    pub fn observe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&FilterValue, bool) + 'static,
    {
        self.inner.observers.add(Rc::new(observer))
    }

    pub fn unobserve(&self, id: SubscriptionId) -> bool {
        self.inner.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Returns true if both handles share the same selection flag.
    pub fn ptr_eq(&self, other: &FilterValue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.value == other.inner.value
    }
}

impl Eq for FilterValue {}

impl Hash for FilterValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.value.hash(state);
    }
}

impl Ord for FilterValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.value.cmp(&other.inner.value)
    }
}

impl PartialOrd for FilterValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.value, f)
    }
}

impl fmt::Debug for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterValue")
            .field("value", &self.inner.value)
            .field("selected", &self.inner.selected.get())
            .finish()
    }
}
