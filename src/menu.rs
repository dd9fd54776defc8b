/// Context menus
///
/// The popup chrome is out of scope; a `ContextMenu` only records what the UI
/// shell needs to draw it: the items it holds, whether it is showing, and
/// where it is anchored.

use crate::header::{HeaderCell, HeaderId};
use crate::observer::{Listeners, SubscriptionId};
use crate::panel::FilterPanel;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Which side of the anchor a popup opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

/// Where a showing popup is anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub anchor: HeaderId,
    pub side: Side,
    pub dx: f64,
    pub dy: f64,
}

/// A menu entry whose content is a filter panel
pub struct CustomMenuItem<R> {
    content: Rc<FilterPanel<R>>,
    hide_on_click: bool,
}

// Derived Clone would require R: Clone
impl<R> Clone for CustomMenuItem<R> {
    fn clone(&self) -> Self {
        CustomMenuItem {
            content: Rc::clone(&self.content),
            hide_on_click: self.hide_on_click,
        }
    }
}

impl<R> CustomMenuItem<R> {
    pub fn new(content: Rc<FilterPanel<R>>, hide_on_click: bool) -> Self {
        CustomMenuItem {
            content,
            hide_on_click,
        }
    }

    pub fn content(&self) -> &Rc<FilterPanel<R>> {
        &self.content
    }

    /// Whether clicking inside the item closes the menu
    pub fn hide_on_click(&self) -> bool {
        self.hide_on_click
    }
}

pub struct ContextMenu<R> {
    items: RefCell<Vec<CustomMenuItem<R>>>,
    placement: Cell<Option<PopupPlacement>>,
    on_hiding: Listeners<dyn Fn()>,
}

impl<R> Default for ContextMenu<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ContextMenu<R> {
    pub fn new() -> Self {
        ContextMenu {
            items: RefCell::new(Vec::new()),
            placement: Cell::new(None),
            on_hiding: Listeners::new(),
        }
    }

    pub fn add_item(&self, item: CustomMenuItem<R>) {
        self.items.borrow_mut().push(item);
    }

    pub fn items(&self) -> Vec<CustomMenuItem<R>> {
        self.items.borrow().clone()
    }

    /// Show the menu next to `anchor`, offset by `(dx, dy)`.
    pub fn show(&self, anchor: &HeaderCell, side: Side, dx: f64, dy: f64) {
        log::debug!("context menu shown at header {:?} ({:?}, {}, {})", anchor.id(), side, dx, dy);
        self.placement.set(Some(PopupPlacement {
            anchor: anchor.id(),
            side,
            dx,
            dy,
        }));
    }

    /// Hide the menu. Hiding callbacks run only if it was showing.
    pub fn hide(&self) {
        if self.placement.take().is_none() {
            return;
        }
        for callback in self.on_hiding.snapshot() {
            callback();
        }
    }

    pub fn is_showing(&self) -> bool {
        self.placement.get().is_some()
    }

    pub fn placement(&self) -> Option<PopupPlacement> {
        self.placement.get()
    }

    pub fn on_hiding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.on_hiding.add(Rc::new(callback))
    }
}
