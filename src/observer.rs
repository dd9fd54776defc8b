/// Callback registries
///
/// Selection flags, projections, header cells and panels all notify
/// interested parties synchronously. A `Listeners` list hands out a snapshot
/// of its callbacks before they run, so a callback may subscribe, unsubscribe
/// or trigger another notification on the same list without a double borrow.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by every `subscribe`/`observe` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) struct Listeners<F: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Rc<F>)>>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> Listeners<F> {
    pub(crate) fn new() -> Self {
        Listeners {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, callback: Rc<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    /// Returns false if the id was not registered.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    /// Callbacks in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
