/// Column filters
///
/// A `ColumnFilter` maintains the distinct values of one column as
/// `FilterValue`s and puts a filter panel into that column's header context
/// menu. It never decides row visibility itself; the owning table filter
/// reads the selection state from it when executing.

use crate::column::TableColumn;
use crate::filter_value::FilterValue;
use crate::menu::ContextMenu;
use crate::panel::FilterPanel;
use crate::projection::DistinctMapping;
use crate::table_filter::TableFilterHost;
use crate::value::ColumnValue;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::rc::{Rc, Weak};

pub struct ColumnFilter<R> {
    table_filter: Weak<dyn TableFilterHost<R>>,
    column: Rc<TableColumn<R>>,
    filter_values: Rc<DistinctMapping<R, FilterValue>>,
    panel: OnceCell<Rc<FilterPanel<R>>>,
}

impl<R: 'static> ColumnFilter<R> {
    /// Project `column` over the owner's backing list and install the filter
    /// panel as the column's context menu.
    pub fn new(table_filter: &Rc<dyn TableFilterHost<R>>, column: Rc<TableColumn<R>>) -> Rc<Self> {
        let accessor = Rc::clone(&column);
        let filter_values = DistinctMapping::project(&table_filter.backing_list(), move |row: &R| {
            FilterValue::new(accessor.cell_value(row))
        });

        let column_filter = Rc::new(ColumnFilter {
            table_filter: Rc::downgrade(table_filter),
            column,
            filter_values,
            panel: OnceCell::new(),
        });
        column_filter.attach_context_menu(table_filter);
        column_filter
    }

    fn attach_context_menu(self: &Rc<Self>, table_filter: &Rc<dyn TableFilterHost<R>>) {
        let config = table_filter.config();
        let item = FilterPanel::in_menu_item(self, table_filter);
        let panel = Rc::clone(item.content());

        let menu = Rc::new(ContextMenu::new());
        menu.add_item(item);
        if config.reset_search_on_hide {
            let panel = Rc::downgrade(&panel);
            menu.on_hiding(move || {
                if let Some(panel) = panel.upgrade() {
                    panel.reset_search_filter();
                }
            });
        }

        if self.panel.set(panel).is_err() {
            log::warn!("column '{}' already has a filter panel", self.column.text());
        }
        self.column.set_context_menu(Some(menu));
    }

    /// Distinct values in first-observed order
    pub fn filter_values(&self) -> Vec<FilterValue> {
        self.filter_values.items()
    }

    pub fn projection(&self) -> &Rc<DistinctMapping<R, FilterValue>> {
        &self.filter_values
    }

    /// The filter value wrapping `value`, if any row currently holds it
    pub fn filter_value(&self, value: &ColumnValue) -> Option<FilterValue> {
        self.filter_values.find(|fv| fv.value() == value)
    }

    pub fn column(&self) -> &Rc<TableColumn<R>> {
        &self.column
    }

    pub fn table_filter(&self) -> Option<Rc<dyn TableFilterHost<R>>> {
        self.table_filter.upgrade()
    }

    pub fn panel(&self) -> Option<Rc<FilterPanel<R>>> {
        self.panel.get().cloned()
    }

    pub fn selection_map(&self) -> HashMap<ColumnValue, bool> {
        self.filter_values()
            .into_iter()
            .map(|fv| (fv.value().clone(), fv.is_selected()))
            .collect()
    }

    /// Values currently included, in first-observed order
    pub fn selected_values(&self) -> Vec<ColumnValue> {
        self.filter_values()
            .into_iter()
            .filter(|fv| fv.is_selected())
            .map(|fv| fv.value().clone())
            .collect()
    }

    pub fn deselected_values(&self) -> HashSet<ColumnValue> {
        self.filter_values()
            .into_iter()
            .filter(|fv| !fv.is_selected())
            .map(|fv| fv.value().clone())
            .collect()
    }

    /// Returns true if any value is deselected
    pub fn is_filtered(&self) -> bool {
        self.filter_values().iter().any(|fv| !fv.is_selected())
    }

    /// Include every value of this column. Does not recompute visibility.
    pub fn reset(&self) {
        for value in self.filter_values() {
            value.set_selected(true);
        }
    }
}

impl<R: 'static> Debug for ColumnFilter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnFilter")
            .field("column", &self.column.text())
            .field("filter_values", &self.filter_values())
            .finish()
    }
}
