/// Table columns
///
/// A `TableColumn` knows how to pull its cell value out of a row and carries
/// the context menu its header shows. Columns are compared by identity: each
/// instance gets a process-unique `ColumnId`, and header lookup matches on
/// that id, never on the column's title.

use crate::menu::ContextMenu;
use crate::value::ColumnValue;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_COLUMN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one column instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(u64);

impl ColumnId {
    /// Allocate a fresh id. Group headers that own no data column use this
    /// to get an identity of their own.
    pub fn allocate() -> Self {
        ColumnId(NEXT_COLUMN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct TableColumn<R> {
    id: ColumnId,
    text: String,
    accessor: Box<dyn Fn(&R) -> ColumnValue>,
    context_menu: RefCell<Option<Rc<ContextMenu<R>>>>,
}

impl<R> TableColumn<R> {
    pub fn new<F>(text: impl Into<String>, accessor: F) -> Rc<Self>
    where
        F: Fn(&R) -> ColumnValue + 'static,
    {
        Rc::new(TableColumn {
            id: ColumnId::allocate(),
            text: text.into(),
            accessor: Box::new(accessor),
            context_menu: RefCell::new(None),
        })
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The value this column shows for `row`
    pub fn cell_value(&self, row: &R) -> ColumnValue {
        (self.accessor)(row)
    }

    pub fn context_menu(&self) -> Option<Rc<ContextMenu<R>>> {
        self.context_menu.borrow().clone()
    }

    pub fn set_context_menu(&self, menu: Option<Rc<ContextMenu<R>>>) {
        *self.context_menu.borrow_mut() = menu;
    }
}

impl<R> Debug for TableColumn<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TableColumn {{ id: {:?}, text: '{}', has_context_menu: {} }}",
            self.id,
            self.text,
            self.context_menu.borrow().is_some()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product {
        name: &'static str,
        quantity: i32,
    }

    #[test]
    fn test_cell_value() {
        let name = TableColumn::new("product", |p: &Product| ColumnValue::from(p.name));
        let quantity = TableColumn::new("quantity", |p: &Product| ColumnValue::Int32(p.quantity));

        let row = Product { name: "Widget", quantity: 10 };
        assert_eq!(name.cell_value(&row), ColumnValue::from("Widget"));
        assert_eq!(quantity.cell_value(&row).as_i32(), Some(10));
        assert_eq!(name.text(), "product");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TableColumn::new("same", |v: &i32| ColumnValue::Int32(*v));
        let b = TableColumn::new("same", |v: &i32| ColumnValue::Int32(*v));
        assert_ne!(a.id(), b.id());
        assert_ne!(ColumnId::allocate(), ColumnId::allocate());
    }

    #[test]
    fn test_context_menu_slot() {
        let column = TableColumn::new("id", |v: &i32| ColumnValue::Int32(*v));
        assert!(column.context_menu().is_none());

        column.set_context_menu(Some(Rc::new(ContextMenu::new())));
        assert!(column.context_menu().is_some());
        assert!(format!("{:?}", column).contains("has_context_menu: true"));
    }
}
