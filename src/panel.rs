/// Filter panel
///
/// The content of a column's filter popup: a search field over the column's
/// distinct values, one checkbox per value, and the APPLY / RESET / RESET ALL
/// actions. The panel is headless; an embedding UI reads `items()` and
/// `labels()` to draw it and listens to `on_change` to know when to redraw.
///
/// Checkboxes are bound directly to the shared `FilterValue` flags, so
/// toggling one is immediately visible to every other holder of that value.
/// Only APPLY and RESET ALL make the table filter recompute row visibility.
///
/// # Examples
///
/// ```
/// use tablefilter::{ColumnValue, RowSource, TableColumn, TableFilter, TableView};
/// use std::rc::Rc;
///
/// let rows = Rc::new(RowSource::from_rows(vec!["pear", "apple", "fig", "apple"]));
/// let fruit = TableColumn::new("fruit", |r: &&'static str| ColumnValue::from(*r));
/// let table = TableView::new(rows, vec![fruit.clone()]);
/// let filter = TableFilter::for_table(table);
///
/// let panel = filter.column_filter(fruit.id()).unwrap().panel().unwrap();
/// let labels: Vec<String> = panel.items().iter().map(|i| i.label().to_string()).collect();
/// assert_eq!(labels, vec!["apple", "fig", "pear"]);
///
/// panel.set_search_text("p");
/// assert_eq!(panel.items().len(), 2);
///
/// panel.items()[0].set_checked(false);
/// panel.apply();
/// assert_eq!(filter.visible_indices(), vec![0, 2]);
/// ```

use crate::column::TableColumn;
use crate::column_filter::ColumnFilter;
use crate::filter_value::FilterValue;
use crate::header::{ContextMenuEvent, HeaderLayout};
use crate::menu::{CustomMenuItem, Side};
use crate::observer::{Listeners, SubscriptionId};
use crate::projection::{DistinctMapping, ProjectionChange};
use crate::table::TableView;
use crate::table_filter::TableFilterHost;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

/// Prompt and button texts shown by the panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLabels {
    pub search_prompt: String,
    pub apply: String,
    pub reset: String,
    pub reset_all: String,
}

/// One checkbox row, bound to a filter value
#[derive(Debug, Clone)]
pub struct CheckItem {
    filter_value: FilterValue,
    label: String,
}

impl CheckItem {
    fn new(filter_value: FilterValue) -> Self {
        let label = filter_value.to_string();
        CheckItem { filter_value, label }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn filter_value(&self) -> &FilterValue {
        &self.filter_value
    }

    pub fn is_checked(&self) -> bool {
        self.filter_value.is_selected()
    }

    pub fn set_checked(&self, checked: bool) {
        self.filter_value.set_selected(checked);
    }

    pub fn toggle(&self) {
        self.filter_value.toggle();
    }
}

/// Where to open a column's context menu when its header asks for one
struct HeaderAnchor<R> {
    column: Weak<TableColumn<R>>,
    side: Side,
    dx: f64,
    dy: f64,
}

impl<R> Clone for HeaderAnchor<R> {
    fn clone(&self) -> Self {
        HeaderAnchor {
            column: self.column.clone(),
            side: self.side,
            dx: self.dx,
            dy: self.dy,
        }
    }
}

impl<R: 'static> HeaderAnchor<R> {
    /// Install the context menu handler on the header bound to the column.
    /// Returns false if the layout has no such header.
    fn attach(&self, layout: &dyn HeaderLayout) -> bool {
        let Some(column) = self.column.upgrade() else {
            return false;
        };
        let Some(cell) = layout.find_leaf_header_for(column.id()) else {
            log::warn!("no header found for column '{}', filter menu not anchored", column.text());
            return false;
        };

        let weak_column = self.column.clone();
        let weak_cell = Rc::downgrade(&cell);
        let (side, dx, dy) = (self.side, self.dx, self.dy);
        cell.set_on_context_menu_requested(Some(Rc::new(move |event: &ContextMenuEvent| {
            let (Some(column), Some(cell)) = (weak_column.upgrade(), weak_cell.upgrade()) else {
                return;
            };
            if let Some(menu) = column.context_menu() {
                menu.show(&cell, side, dx, dy);
                event.consume();
            }
        })));
        true
    }
}

pub struct FilterPanel<R> {
    this: Weak<FilterPanel<R>>,
    column_filter: Weak<ColumnFilter<R>>,
    table: Weak<TableView<R>>,
    projection: Weak<DistinctMapping<R, FilterValue>>,
    anchor: HeaderAnchor<R>,
    labels: PanelLabels,
    case_sensitive: bool,
    search_text: RefCell<String>,
    revision: Cell<u64>,
    listeners: Listeners<dyn Fn()>,
    watched: RefCell<HashMap<FilterValue, SubscriptionId>>,
    projection_subscription: Cell<Option<SubscriptionId>>,
    layout_subscription: Cell<Option<SubscriptionId>>,
    /// The layout currently re-anchored on header changes
    header_subscription: RefCell<Option<(Weak<dyn HeaderLayout>, SubscriptionId)>>,
}

impl<R: 'static> FilterPanel<R> {
    /// Build the panel for `column_filter` and wrap it in a menu item.
    ///
    /// The panel anchors the column's context menu to its header as soon as
    /// the table has a header layout, and again every time that layout or
    /// its header structure changes.
    pub fn in_menu_item(
        column_filter: &Rc<ColumnFilter<R>>,
        table_filter: &Rc<dyn TableFilterHost<R>>,
    ) -> CustomMenuItem<R> {
        let config = table_filter.config();
        let table = table_filter.table();
        let projection = column_filter.projection();

        let panel = Rc::new_cyclic(|this| FilterPanel {
            this: this.clone(),
            column_filter: Rc::downgrade(column_filter),
            table: Rc::downgrade(&table),
            projection: Rc::downgrade(projection),
            anchor: HeaderAnchor {
                column: Rc::downgrade(column_filter.column()),
                side: config.popup_side,
                dx: config.popup_offset.0,
                dy: config.popup_offset.1,
            },
            labels: PanelLabels {
                search_prompt: config.search_prompt.clone(),
                apply: config.apply_label.clone(),
                reset: config.reset_label.clone(),
                reset_all: config.reset_all_label.clone(),
            },
            case_sensitive: config.case_sensitive_search,
            search_text: RefCell::new(String::new()),
            revision: Cell::new(0),
            listeners: Listeners::new(),
            watched: RefCell::new(HashMap::new()),
            projection_subscription: Cell::new(None),
            layout_subscription: Cell::new(None),
            header_subscription: RefCell::new(None),
        });

        for value in projection.items() {
            panel.watch(&value);
        }
        let weak = Rc::downgrade(&panel);
        let id = projection.subscribe(move |change| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            match change {
                ProjectionChange::Added(value) => panel.watch(value),
                ProjectionChange::Removed(value) => panel.unwatch(value),
            }
            panel.changed();
        });
        panel.projection_subscription.set(Some(id));

        let weak = Rc::downgrade(&panel);
        let id = table.on_header_layout_changed(move |layout| {
            if let Some(panel) = weak.upgrade() {
                panel.anchor_to_header(layout);
            }
        });
        panel.layout_subscription.set(Some(id));
        if let Some(layout) = table.header_layout() {
            panel.anchor_to_header(&layout);
        }

        CustomMenuItem::new(panel, config.hide_on_click)
    }

    /// Anchor the column's context menu to its header in `layout`, and keep
    /// it anchored across header changes. A previously anchored layout stops
    /// being watched.
    pub fn anchor_to_header(&self, layout: &Rc<dyn HeaderLayout>) {
        self.anchor.attach(layout.as_ref());

        let weak_layout = Rc::downgrade(layout);
        let already_watching = self
            .header_subscription
            .borrow()
            .as_ref()
            .is_some_and(|(watched, _)| watched.ptr_eq(&weak_layout));
        if already_watching {
            return;
        }
        self.stop_watching_headers();

        let anchor = self.anchor.clone();
        let listener_layout = weak_layout.clone();
        let id = layout.on_headers_changed(Rc::new(move || {
            if let Some(layout) = listener_layout.upgrade() {
                anchor.attach(layout.as_ref());
            }
        }));
        *self.header_subscription.borrow_mut() = Some((weak_layout, id));
    }

    /// Visible checkbox rows: values matching the search text, in natural
    /// value order
    pub fn items(&self) -> Vec<CheckItem> {
        let search = self.search_text.borrow().clone();
        let mut values: Vec<FilterValue> = self
            .filter_values()
            .into_iter()
            .filter(|fv| fv.value().contains_text(&search, self.case_sensitive))
            .collect();
        values.sort();
        values.into_iter().map(CheckItem::new).collect()
    }

    /// Every checkbox row regardless of search text, in natural value order
    pub fn all_items(&self) -> Vec<CheckItem> {
        let mut values = self.filter_values();
        values.sort();
        values.into_iter().map(CheckItem::new).collect()
    }

    fn filter_values(&self) -> Vec<FilterValue> {
        self.column_filter
            .upgrade()
            .map(|cf| cf.filter_values())
            .unwrap_or_default()
    }

    fn table_filter(&self) -> Option<Rc<dyn TableFilterHost<R>>> {
        self.column_filter.upgrade()?.table_filter()
    }

    /// Recompute row visibility. Selection is left as is.
    pub fn apply(&self) {
        match self.table_filter() {
            Some(table_filter) => {
                log::debug!("apply filter from column '{}'", self.column_text());
                table_filter.execute_filter();
            }
            None => log::warn!(
                "filter panel for '{}' has no table filter, apply ignored",
                self.column_text()
            ),
        }
    }

    /// Include every value of this column without recomputing.
    pub fn reset(&self) {
        match self.column_filter.upgrade() {
            Some(column_filter) => {
                log::debug!("reset filter of column '{}'", self.column_text());
                column_filter.reset();
            }
            None => log::warn!("filter panel has no column filter, reset ignored"),
        }
    }

    /// Include every value of every column, then recompute once.
    pub fn reset_all(&self) {
        let Some(table_filter) = self.table_filter() else {
            log::warn!(
                "filter panel for '{}' has no table filter, reset all ignored",
                self.column_text()
            );
            return;
        };
        log::debug!("reset all filters from column '{}'", self.column_text());
        for column_filter in table_filter.column_filters() {
            column_filter.reset();
        }
        table_filter.execute_filter();
    }

    fn watch(&self, value: &FilterValue) {
        let panel = self.this.clone();
        let id = value.observe(move |_, _| {
            if let Some(panel) = panel.upgrade() {
                panel.changed();
            }
        });
        if let Some(previous) = self.watched.borrow_mut().insert(value.clone(), id) {
            value.unobserve(previous);
        }
    }

    fn unwatch(&self, value: &FilterValue) {
        let removed = self.watched.borrow_mut().remove_entry(value);
        if let Some((retained, id)) = removed {
            retained.unobserve(id);
        }
    }

    fn column_text(&self) -> String {
        self.anchor
            .column
            .upgrade()
            .map(|c| c.text().to_string())
            .unwrap_or_default()
    }
}

impl<R> FilterPanel<R> {
    /// Narrow the displayed values. Never changes selection.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        if *self.search_text.borrow() == text {
            return;
        }
        log::debug!("filter panel search text set to '{}'", text);
        *self.search_text.borrow_mut() = text;
        self.changed();
    }

    pub fn search_text(&self) -> String {
        self.search_text.borrow().clone()
    }

    pub fn reset_search_filter(&self) {
        self.set_search_text(String::new());
    }

    pub fn labels(&self) -> &PanelLabels {
        &self.labels
    }

    /// Bumped on every change an embedding UI should redraw for
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.listeners.add(Rc::new(listener))
    }

    pub fn remove_change_listener(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn stop_watching_headers(&self) {
        let previous = self.header_subscription.borrow_mut().take();
        if let Some((layout, id)) = previous {
            if let Some(layout) = layout.upgrade() {
                layout.remove_headers_listener(id);
            }
        }
    }

    fn changed(&self) {
        self.revision.set(self.revision.get() + 1);
        for listener in self.listeners.snapshot() {
            listener();
        }
    }
}

impl<R> Drop for FilterPanel<R> {
    fn drop(&mut self) {
        for (value, id) in self.watched.get_mut().drain() {
            value.unobserve(id);
        }
        let subscription = self.projection_subscription.get();
        if let (Some(projection), Some(id)) = (self.projection.upgrade(), subscription) {
            projection.unsubscribe(id);
        }
        if let (Some(table), Some(id)) = (self.table.upgrade(), self.layout_subscription.get()) {
            table.remove_header_layout_listener(id);
        }
        self.stop_watching_headers();
    }
}

impl<R> Debug for FilterPanel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPanel")
            .field("search_text", &*self.search_text.borrow())
            .field("revision", &self.revision.get())
            .field("labels", &self.labels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnId;
    use crate::config::FilterPanelConfig;
    use crate::header::HeaderCell;
    use crate::row_source::RowSource;
    use crate::table_filter::TableFilter;
    use crate::value::ColumnValue;
    use test_log::test;

    #[derive(Debug, Clone)]
    struct Item {
        name: &'static str,
        color: &'static str,
    }

    fn item(name: &'static str, color: &'static str) -> Item {
        Item { name, color }
    }

    struct Fixture {
        rows: Rc<RowSource<Item>>,
        name: Rc<TableColumn<Item>>,
        color: Rc<TableColumn<Item>>,
        table: Rc<TableView<Item>>,
        filter: Rc<TableFilter<Item>>,
    }

    impl Fixture {
        fn new(config: FilterPanelConfig) -> Self {
            let rows = Rc::new(RowSource::from_rows(vec![
                item("Widget", "red"),
                item("gadget", "blue"),
                item("Gizmo", "red"),
                item("Widget", "green"),
            ]));
            let name = TableColumn::new("name", |i: &Item| ColumnValue::from(i.name));
            let color = TableColumn::new("color", |i: &Item| ColumnValue::from(i.color));
            let table = TableView::new(Rc::clone(&rows), vec![Rc::clone(&name), Rc::clone(&color)]);
            let filter = TableFilter::with_config(Rc::clone(&table), config);
            Fixture { rows, name, color, table, filter }
        }

        fn panel(&self, column: &TableColumn<Item>) -> Rc<FilterPanel<Item>> {
            self.filter.column_filter(column.id()).unwrap().panel().unwrap()
        }
    }

    fn labels(items: &[CheckItem]) -> Vec<&str> {
        items.iter().map(|i| i.label()).collect()
    }

    #[test]
    fn test_items_sorted_by_value() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.name);
        assert_eq!(labels(&panel.items()), vec!["Gizmo", "Widget", "gadget"]);
        assert!(panel.items().iter().all(|i| i.is_checked()));
    }

    #[test]
    fn test_search_is_case_sensitive_by_default() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.name);

        panel.set_search_text("g");
        assert_eq!(labels(&panel.items()), vec!["Widget", "gadget"]);
        panel.set_search_text("G");
        assert_eq!(labels(&panel.items()), vec!["Gizmo"]);
        panel.set_search_text("nothing");
        assert!(panel.items().is_empty());
        assert_eq!(panel.all_items().len(), 3);

        panel.reset_search_filter();
        assert_eq!(panel.search_text(), "");
        assert_eq!(panel.items().len(), 3);
    }

    #[test]
    fn test_search_case_insensitive_when_configured() {
        let config = FilterPanelConfig {
            case_sensitive_search: false,
            ..FilterPanelConfig::default()
        };
        let f = Fixture::new(config);
        let panel = f.panel(&f.name);
        panel.set_search_text("G");
        assert_eq!(labels(&panel.items()), vec!["Gizmo", "Widget", "gadget"]);
    }

    #[test]
    fn test_search_never_touches_selection() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.color);
        panel.items()[0].set_checked(false);

        panel.set_search_text("re");
        panel.reset_search_filter();
        let unchecked: Vec<CheckItem> =
            panel.items().into_iter().filter(|i| !i.is_checked()).collect();
        assert_eq!(labels(&unchecked), vec!["blue"]);
    }

    #[test]
    fn test_checkbox_binding_is_shared() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.color);
        let red = panel.items().into_iter().find(|i| i.label() == "red").unwrap();
        red.toggle();

        let column_filter = f.filter.column_filter(f.color.id()).unwrap();
        assert!(!column_filter.filter_value(&ColumnValue::from("red")).unwrap().is_selected());
        assert!(panel.items().iter().any(|i| i.label() == "red" && !i.is_checked()));
        red.toggle();
        assert!(!column_filter.is_filtered());
    }

    #[test]
    fn test_apply_executes_filter() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.color);
        panel.items().iter().find(|i| i.label() == "red").unwrap().set_checked(false);

        assert_eq!(f.filter.execution_count(), 0);
        panel.apply();
        assert_eq!(f.filter.execution_count(), 1);
        assert_eq!(f.filter.visible_indices(), vec![1, 3]);
        assert!(!panel.items()[2].is_checked());
    }

    #[test]
    fn test_reset_current_column_only() {
        let f = Fixture::new(FilterPanelConfig::default());
        let name_panel = f.panel(&f.name);
        let color_panel = f.panel(&f.color);
        name_panel.items()[0].set_checked(false);
        color_panel.items()[0].set_checked(false);

        name_panel.reset();
        assert!(name_panel.items().iter().all(|i| i.is_checked()));
        assert!(!color_panel.items()[0].is_checked());
        assert_eq!(f.filter.execution_count(), 0);
    }

    #[test]
    fn test_reset_all_executes_once() {
        let f = Fixture::new(FilterPanelConfig::default());
        let name_panel = f.panel(&f.name);
        let color_panel = f.panel(&f.color);
        name_panel.items()[0].set_checked(false);
        color_panel.items()[0].set_checked(false);
        name_panel.apply();
        assert_eq!(f.filter.visible_len(), 2);

        color_panel.reset_all();
        assert_eq!(f.filter.execution_count(), 2);
        assert_eq!(f.filter.visible_len(), 4);
        assert!(name_panel.items().iter().all(|i| i.is_checked()));
        assert!(color_panel.items().iter().all(|i| i.is_checked()));
    }

    #[test]
    fn test_revision_tracks_changes() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.color);
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        panel.on_change(move || counter.set(counter.get() + 1));

        let start = panel.revision();
        panel.items()[0].set_checked(false);
        panel.set_search_text("r");
        panel.set_search_text("r"); // unchanged
        f.rows.push(item("Doohickey", "yellow"));
        f.rows.push(item("Doohickey", "red")); // "red" already present

        assert_eq!(panel.revision(), start + 3);
        assert_eq!(notified.get(), 3);

        // New values are watched too
        let yellow = panel.all_items().into_iter().find(|i| i.label() == "yellow").unwrap();
        yellow.set_checked(false);
        assert_eq!(notified.get(), 4);
    }

    #[test]
    fn test_removed_values_are_unwatched() {
        let f = Fixture::new(FilterPanelConfig::default());
        let panel = f.panel(&f.color);
        let blue = f
            .filter
            .column_filter(f.color.id())
            .unwrap()
            .filter_value(&ColumnValue::from("blue"))
            .unwrap();
        assert_eq!(blue.observer_count(), 1);

        f.rows.remove(1).unwrap();
        assert_eq!(blue.observer_count(), 0);
        let revision = panel.revision();
        blue.set_selected(false);
        assert_eq!(panel.revision(), revision);
    }

    #[test]
    fn test_labels_from_config() {
        let config = FilterPanelConfig {
            apply_label: "OK".to_string(),
            ..FilterPanelConfig::default()
        };
        let f = Fixture::new(config);
        let labels = f.panel(&f.name).labels().clone();
        assert_eq!(labels.apply, "OK");
        assert_eq!(labels.reset, "RESET");
        assert_eq!(labels.reset_all, "RESET ALL");
        assert_eq!(labels.search_prompt, "Search...");
    }

    #[test]
    fn test_anchors_when_layout_installed_later() {
        let f = Fixture::new(FilterPanelConfig::default());
        let group = HeaderCell::nested(None, vec![HeaderCell::leaf(f.name.id())]);
        let root =
            HeaderCell::nested(None, vec![Rc::clone(&group), HeaderCell::leaf(f.color.id())]);

        f.table.set_header_layout(Some(Rc::clone(&root)));

        let name_header = root.find_leaf_header_for(f.name.id()).unwrap();
        assert!(name_header.has_context_menu_handler());
        assert!(!group.has_context_menu_handler());

        assert!(name_header.request_context_menu(10.0, 20.0));
        let menu = f.name.context_menu().unwrap();
        let placement = menu.placement().unwrap();
        assert_eq!(placement.anchor, name_header.id());
        assert_eq!(placement.side, Side::Bottom);
        assert_eq!((placement.dx, placement.dy), (5.0, 5.0));
    }

    #[test]
    fn test_anchors_to_existing_layout() {
        let rows = Rc::new(RowSource::from_rows(vec![1, 2, 2]));
        let number = TableColumn::new("n", |v: &i32| ColumnValue::Int32(*v));
        let table = TableView::new(rows, vec![Rc::clone(&number)]);
        let root = HeaderCell::row(vec![number.id()]);
        table.set_header_layout(Some(Rc::clone(&root)));

        let _filter = TableFilter::for_table(Rc::clone(&table));
        let header = root.find_leaf_header_for(number.id()).unwrap();
        assert!(header.request_context_menu(0.0, 0.0));
        assert!(number.context_menu().unwrap().is_showing());
    }

    #[test]
    fn test_reanchors_on_header_change() {
        let f = Fixture::new(FilterPanelConfig::default());
        let root = HeaderCell::nested(None, vec![HeaderCell::leaf(f.color.id())]);
        f.table.set_header_layout(Some(Rc::clone(&root)));

        // No header for "name" yet: anchoring is skipped, not an error
        assert!(root.find_leaf_header_for(f.name.id()).is_none());

        let group = HeaderCell::nested(Some(ColumnId::allocate()), Vec::new());
        root.push_child(Rc::clone(&group));
        group.push_child(HeaderCell::leaf(f.name.id()));

        let name_header = root.find_leaf_header_for(f.name.id()).unwrap();
        assert!(name_header.request_context_menu(1.0, 1.0));
        assert_eq!(f.name.context_menu().unwrap().placement().unwrap().anchor, name_header.id());
    }

    #[test]
    fn test_replaced_layout_is_no_longer_watched() {
        let f = Fixture::new(FilterPanelConfig::default());
        let first = HeaderCell::row(vec![f.color.id()]);
        f.table.set_header_layout(Some(Rc::clone(&first)));
        assert_eq!(first.headers_listener_count(), 2);

        let second = HeaderCell::row(vec![f.name.id(), f.color.id()]);
        f.table.set_header_layout(Some(Rc::clone(&second)));
        assert_eq!(first.headers_listener_count(), 0);
        assert_eq!(second.headers_listener_count(), 2);

        // Growing the old layout anchors nothing
        first.push_child(HeaderCell::leaf(f.name.id()));
        let stale = first.find_leaf_header_for(f.name.id()).unwrap();
        assert!(!stale.has_context_menu_handler());
        assert!(!stale.request_context_menu(0.0, 0.0));

        let current = second.find_leaf_header_for(f.name.id()).unwrap();
        assert!(current.request_context_menu(0.0, 0.0));
        assert_eq!(f.name.context_menu().unwrap().placement().unwrap().anchor, current.id());

        // Installing the same layout again does not stack listeners
        f.table.set_header_layout(Some(Rc::clone(&second)));
        assert_eq!(second.headers_listener_count(), 2);
    }

    #[test]
    fn test_custom_popup_placement() {
        let config = FilterPanelConfig {
            popup_side: Side::Right,
            popup_offset: (0.0, 8.0),
            ..FilterPanelConfig::default()
        };
        let f = Fixture::new(config);
        let root = HeaderCell::row(vec![f.name.id(), f.color.id()]);
        f.table.set_header_layout(Some(Rc::clone(&root)));

        root.find_leaf_header_for(f.color.id()).unwrap().request_context_menu(0.0, 0.0);
        let placement = f.color.context_menu().unwrap().placement().unwrap();
        assert_eq!(placement.side, Side::Right);
        assert_eq!((placement.dx, placement.dy), (0.0, 8.0));
        assert!(!f.name.context_menu().unwrap().is_showing());
    }
}
