/// Header tree
///
/// A table header is a tree of cells. Leaves are bound to one column each;
/// nested cells group their children and may be bound to a group column of
/// their own. Every structural change fires change notification on the
/// changed cell and on each of its ancestors, so a listener on the root
/// hears about edits anywhere below it.

use crate::column::ColumnId;
use crate::observer::{Listeners, SubscriptionId};
use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HEADER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderId(u64);

impl HeaderId {
    fn allocate() -> Self {
        HeaderId(NEXT_HEADER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A request to open a header's context menu at `(x, y)`
#[derive(Debug)]
pub struct ContextMenuEvent {
    pub x: f64,
    pub y: f64,
    consumed: Cell<bool>,
}

impl ContextMenuEvent {
    pub fn new(x: f64, y: f64) -> Self {
        ContextMenuEvent {
            x,
            y,
            consumed: Cell::new(false),
        }
    }

    /// Mark the event as handled so it does not propagate further.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}

pub type ContextMenuHandler = Rc<dyn Fn(&ContextMenuEvent)>;

/// Capability the filter anchoring logic needs from a header renderer
pub trait HeaderLayout {
    /// Depth-first search for the header bound to `column`. A node is checked
    /// before its children.
    fn find_leaf_header_for(&self, column: ColumnId) -> Option<Rc<HeaderCell>>;

    /// Register a callback run whenever the header structure changes.
    fn on_headers_changed(&self, listener: Rc<dyn Fn()>) -> SubscriptionId;

    fn remove_headers_listener(&self, id: SubscriptionId) -> bool;
}

pub struct HeaderCell {
    id: HeaderId,
    column: Option<ColumnId>,
    nested: bool,
    this: Weak<HeaderCell>,
    parent: RefCell<Weak<HeaderCell>>,
    children: RefCell<Vec<Rc<HeaderCell>>>,
    on_context_menu_requested: RefCell<Option<ContextMenuHandler>>,
    listeners: Listeners<dyn Fn()>,
}

impl HeaderCell {
    fn build(column: Option<ColumnId>, nested: bool, children: Vec<Rc<HeaderCell>>) -> Rc<Self> {
        let cell = Rc::new_cyclic(|this| HeaderCell {
            id: HeaderId::allocate(),
            column,
            nested,
            this: this.clone(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            on_context_menu_requested: RefCell::new(None),
            listeners: Listeners::new(),
        });
        for child in &children {
            *child.parent.borrow_mut() = Rc::downgrade(&cell);
        }
        *cell.children.borrow_mut() = children;
        cell
    }

    /// A header bound to a single column
    pub fn leaf(column: ColumnId) -> Rc<Self> {
        Self::build(Some(column), false, Vec::new())
    }

    /// A group header over `children`
    pub fn nested(column: Option<ColumnId>, children: Vec<Rc<HeaderCell>>) -> Rc<Self> {
        Self::build(column, true, children)
    }

    /// A flat header row: an unbound root with one leaf per column
    pub fn row<I>(columns: I) -> Rc<Self>
    where
        I: IntoIterator<Item = ColumnId>,
    {
        Self::nested(None, columns.into_iter().map(HeaderCell::leaf).collect())
    }

    pub fn id(&self) -> HeaderId {
        self.id
    }

    pub fn column(&self) -> Option<ColumnId> {
        self.column
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub fn children(&self) -> Vec<Rc<HeaderCell>> {
        self.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<Rc<HeaderCell>> {
        self.parent.borrow().upgrade()
    }

    /// Replace the child list.
    pub fn set_children(&self, children: Vec<Rc<HeaderCell>>) {
        let old = std::mem::take(&mut *self.children.borrow_mut());
        for child in &old {
            *child.parent.borrow_mut() = Weak::new();
        }
        for child in &children {
            *child.parent.borrow_mut() = self.this.clone();
        }
        *self.children.borrow_mut() = children;
        self.notify_changed();
    }

    pub fn push_child(&self, child: Rc<HeaderCell>) {
        *child.parent.borrow_mut() = self.this.clone();
        self.children.borrow_mut().push(child);
        self.notify_changed();
    }

    /// Detach `child`. Returns false if it is not a direct child.
    pub fn remove_child(&self, child: &Rc<HeaderCell>) -> bool {
        let removed = {
            let mut children = self.children.borrow_mut();
            match children.iter().position(|c| Rc::ptr_eq(c, child)) {
                Some(pos) => Some(children.remove(pos)),
                None => None,
            }
        };
        match removed {
            Some(removed) => {
                *removed.parent.borrow_mut() = Weak::new();
                self.notify_changed();
                true
            }
            None => false,
        }
    }

    pub fn set_on_context_menu_requested(&self, handler: Option<ContextMenuHandler>) {
        *self.on_context_menu_requested.borrow_mut() = handler;
    }

    pub fn has_context_menu_handler(&self) -> bool {
        self.on_context_menu_requested.borrow().is_some()
    }

    /// Number of callbacks registered through `on_headers_changed`
    pub fn headers_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver a context-menu request to this cell's handler.
    /// Returns true if the handler consumed it.
    pub fn request_context_menu(&self, x: f64, y: f64) -> bool {
        let handler = self.on_context_menu_requested.borrow().clone();
        let event = ContextMenuEvent::new(x, y);
        if let Some(handler) = handler {
            handler(&event);
        }
        event.is_consumed()
    }

    fn notify_changed(&self) {
        let mut cell = self.this.upgrade();
        while let Some(current) = cell {
            for listener in current.listeners.snapshot() {
                listener();
            }
            cell = current.parent();
        }
    }
}

fn scan(column: ColumnId, cell: &Rc<HeaderCell>) -> Option<Rc<HeaderCell>> {
    if cell.column == Some(column) {
        return Some(Rc::clone(cell));
    }
    cell.children().iter().find_map(|child| scan(column, child))
}

impl HeaderLayout for HeaderCell {
    fn find_leaf_header_for(&self, column: ColumnId) -> Option<Rc<HeaderCell>> {
        let root = self.this.upgrade()?;
        scan(column, &root)
    }

    fn on_headers_changed(&self, listener: Rc<dyn Fn()>) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn remove_headers_listener(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

impl Debug for HeaderCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderCell")
            .field("id", &self.id)
            .field("column", &self.column)
            .field("nested", &self.nested)
            .field("children", &*self.children.borrow())
            .finish()
    }
}
