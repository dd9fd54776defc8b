/// Host table control
///
/// A `TableView` ties a row source to its columns and to the header layout a
/// renderer installs. The layout usually arrives after the view (and any
/// filter on it) has been built, so consumers subscribe to
/// `on_header_layout_changed` instead of reading the slot once.
///
/// # Examples
///
/// ```
/// use tablefilter::{ColumnValue, HeaderCell, RowSource, TableColumn, TableView};
/// use std::rc::Rc;
///
/// let rows = Rc::new(RowSource::from_rows(vec![("Widget", 10), ("Gadget", 5)]));
/// let product = TableColumn::new("product", |r: &(&str, i32)| ColumnValue::from(r.0));
/// let quantity = TableColumn::new("quantity", |r: &(&str, i32)| ColumnValue::Int32(r.1));
///
/// let table = TableView::new(rows, vec![product.clone(), quantity]);
/// assert!(table.header_layout().is_none());
///
/// table.set_header_layout(Some(HeaderCell::row(table.columns().iter().map(|c| c.id()))));
/// assert!(table.header_layout().is_some());
/// assert_eq!(table.column(product.id()).unwrap().text(), "product");
/// ```

use crate::column::{ColumnId, TableColumn};
use crate::header::HeaderLayout;
use crate::observer::{Listeners, SubscriptionId};
use crate::row_source::RowSource;
use std::cell::RefCell;
use std::rc::Rc;

pub struct TableView<R> {
    items: Rc<RowSource<R>>,
    columns: Vec<Rc<TableColumn<R>>>,
    header_layout: RefCell<Option<Rc<dyn HeaderLayout>>>,
    layout_listeners: Listeners<dyn Fn(&Rc<dyn HeaderLayout>)>,
}

impl<R> TableView<R> {
    pub fn new(items: Rc<RowSource<R>>, columns: Vec<Rc<TableColumn<R>>>) -> Rc<Self> {
        Rc::new(TableView {
            items,
            columns,
            header_layout: RefCell::new(None),
            layout_listeners: Listeners::new(),
        })
    }

    pub fn items(&self) -> Rc<RowSource<R>> {
        Rc::clone(&self.items)
    }

    pub fn columns(&self) -> &[Rc<TableColumn<R>>] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<Rc<TableColumn<R>>> {
        self.columns.iter().find(|c| c.id() == id).cloned()
    }

    pub fn header_layout(&self) -> Option<Rc<dyn HeaderLayout>> {
        self.header_layout.borrow().clone()
    }

    /// Install (or clear) the header layout. Listeners run only when a layout
    /// is installed.
    pub fn set_header_layout<L>(&self, layout: Option<Rc<L>>)
    where
        L: HeaderLayout + 'static,
    {
        let layout = layout.map(|l| l as Rc<dyn HeaderLayout>);
        *self.header_layout.borrow_mut() = layout.clone();
        if let Some(layout) = layout {
            for listener in self.layout_listeners.snapshot() {
                listener(&layout);
            }
        }
    }

    pub fn on_header_layout_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Rc<dyn HeaderLayout>) + 'static,
    {
        self.layout_listeners.add(Rc::new(listener))
    }

    pub fn remove_header_layout_listener(&self, id: SubscriptionId) -> bool {
        self.layout_listeners.remove(id)
    }
}
