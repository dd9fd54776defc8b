/// TableFilter - Per-Column Value Filters for Table Controls
///
/// Each column of a table gets a live list of its distinct cell values, one
/// checkbox per value, and a searchable filter panel in the column header's
/// context menu. The distinct values are maintained incrementally as rows
/// are inserted, removed and replaced, and each value keeps its selection
/// state for as long as any row holds it.
///
/// The crate is headless and single-threaded: rendering is left to the
/// embedding UI, which drives everything through `Rc` handles and observer
/// callbacks.

pub mod value;
pub mod error;
pub mod observer;
pub mod changeset;
pub mod row_source;
pub mod projection;
pub mod filter_value;
pub mod column;
pub mod menu;
pub mod header;
pub mod table;
pub mod config;
pub mod column_filter;
pub mod panel;
pub mod table_filter;

pub use value::ColumnValue;
pub use error::FilterError;
pub use observer::SubscriptionId;
pub use changeset::{Changeset, IncrementalView, IndexAdjuster, RowChange};
pub use row_source::RowSource;
pub use projection::{DistinctMapping, ProjectionChange};
pub use filter_value::FilterValue;
pub use column::{ColumnId, TableColumn};
pub use menu::{ContextMenu, CustomMenuItem, PopupPlacement, Side};
pub use header::{ContextMenuEvent, ContextMenuHandler, HeaderCell, HeaderId, HeaderLayout};
pub use table::TableView;
pub use config::FilterPanelConfig;
pub use column_filter::ColumnFilter;
pub use panel::{CheckItem, FilterPanel, PanelLabels};
pub use table_filter::{TableFilter, TableFilterHost};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use test_log::test;

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: i32,
        product: &'static str,
        region: &'static str,
        quantity: i32,
    }

    fn order(id: i32, product: &'static str, region: &'static str, quantity: i32) -> Order {
        Order { id, product, region, quantity }
    }

    struct Session {
        rows: Rc<RowSource<Order>>,
        product: Rc<TableColumn<Order>>,
        region: Rc<TableColumn<Order>>,
        quantity: Rc<TableColumn<Order>>,
        table: Rc<TableView<Order>>,
        filter: Rc<TableFilter<Order>>,
    }

    fn session(rows: Vec<Order>) -> Session {
        let rows = Rc::new(RowSource::from_rows(rows));
        let product = TableColumn::new("product", |o: &Order| ColumnValue::from(o.product));
        let region = TableColumn::new("region", |o: &Order| ColumnValue::from(o.region));
        let quantity = TableColumn::new("quantity", |o: &Order| ColumnValue::Int32(o.quantity));
        let table = TableView::new(
            Rc::clone(&rows),
            vec![Rc::clone(&product), Rc::clone(&region), Rc::clone(&quantity)],
        );
        let filter = TableFilter::for_table(Rc::clone(&table));
        Session { rows, product, region, quantity, table, filter }
    }

    fn values(column_filter: &ColumnFilter<Order>) -> Vec<String> {
        column_filter.filter_values().iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_distinct_values_scenario() {
        let s = session(vec![
            order(1, "A", "North", 1),
            order(2, "B", "North", 2),
            order(3, "A", "South", 3),
            order(4, "C", "South", 4),
        ]);
        let products = s.filter.column_filter(s.product.id()).unwrap();
        assert_eq!(values(&products), vec!["A", "B", "C"]);
        assert!(products.filter_values().iter().all(|v| v.is_selected()));

        let a = products.filter_value(&ColumnValue::from("A")).unwrap();
        let b = products.filter_value(&ColumnValue::from("B")).unwrap();
        b.set_selected(false);
        let mut included = products.selected_values();
        included.sort();
        assert_eq!(included, vec![ColumnValue::from("A"), ColumnValue::from("C")]);

        // Replace the "C" row with an "A" row
        s.rows.set(3, order(4, "A", "South", 4)).unwrap();
        assert_eq!(values(&products), vec!["A", "B"]);
        assert!(products.filter_value(&ColumnValue::from("C")).is_none());
        assert!(products.filter_value(&ColumnValue::from("A")).unwrap().ptr_eq(&a));
        assert!(a.is_selected());
        assert!(!products.filter_value(&ColumnValue::from("B")).unwrap().is_selected());
    }

    #[test]
    fn test_filter_session() {
        let s = session(vec![
            order(1, "Widget", "North", 10),
            order(2, "Gadget", "South", 5),
            order(3, "Widget", "South", 10),
            order(4, "Doohickey", "East", 15),
        ]);
        let root = HeaderCell::row(s.table.columns().iter().map(|c| c.id()));
        s.table.set_header_layout(Some(Rc::clone(&root)));

        // Right-click the region header to open its filter
        let region_header = root.find_leaf_header_for(s.region.id()).unwrap();
        assert!(region_header.request_context_menu(40.0, 12.0));
        let menu = s.region.context_menu().unwrap();
        assert!(menu.is_showing());

        let panel = Rc::clone(menu.items()[0].content());
        panel.set_search_text("th");
        let shown: Vec<String> = panel.items().iter().map(|i| i.label().to_string()).collect();
        assert_eq!(shown, vec!["North", "South"]);
        panel.items()[0].set_checked(false);
        panel.apply();

        let ids: Vec<i32> = s.filter.visible_rows().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);

        // Closing the menu clears the search but keeps the selection
        menu.hide();
        assert_eq!(panel.search_text(), "");
        assert_eq!(panel.items().len(), 3);

        // New rows are filtered against the applied selection
        s.rows.push(order(5, "Gizmo", "North", 1));
        s.rows.push(order(6, "Gizmo", "West", 1));
        let ids: Vec<i32> = s.filter.visible_rows().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 6]);

        // A second column narrows further
        let quantities = s.filter.column_filter(s.quantity.id()).unwrap();
        quantities.filter_value(&ColumnValue::Int32(10)).unwrap().set_selected(false);
        quantities.panel().unwrap().apply();
        let ids: Vec<i32> = s.filter.visible_rows().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 4, 6]);

        // Reset all from any panel restores every row with one execution
        let executions = s.filter.execution_count();
        panel.reset_all();
        assert_eq!(s.filter.execution_count(), executions + 1);
        assert_eq!(s.filter.visible_len(), 6);
    }

    #[test]
    fn test_nested_headers_anchor_leaf() {
        let s = session(vec![order(1, "Widget", "North", 10)]);
        let group = HeaderCell::nested(
            Some(ColumnId::allocate()),
            vec![HeaderCell::leaf(s.product.id()), HeaderCell::leaf(s.region.id())],
        );
        let root =
            HeaderCell::nested(None, vec![Rc::clone(&group), HeaderCell::leaf(s.quantity.id())]);
        s.table.set_header_layout(Some(Rc::clone(&root)));

        let region_header = root.find_leaf_header_for(s.region.id()).unwrap();
        assert!(!region_header.is_nested());
        assert!(Rc::ptr_eq(&region_header.parent().unwrap(), &group));
        assert!(!group.has_context_menu_handler());

        assert!(region_header.request_context_menu(0.0, 0.0));
        let placement = s.region.context_menu().unwrap().placement().unwrap();
        assert_eq!(placement.anchor, region_header.id());
        assert!(!group.request_context_menu(0.0, 0.0));
    }

    #[test]
    fn test_reset_all_executes_once() {
        let s = session(vec![
            order(1, "Widget", "North", 10),
            order(2, "Gadget", "South", 5),
        ]);
        for column_filter in s.filter.column_filters() {
            for value in column_filter.filter_values() {
                value.set_selected(false);
            }
        }
        s.filter.execute_filter();
        assert_eq!(s.filter.visible_len(), 0);

        let executions = Rc::new(Cell::new(0));
        let counter = Rc::clone(&executions);
        s.filter.on_filter_executed(move |_| counter.set(counter.get() + 1));

        s.filter.column_filter(s.region.id()).unwrap().panel().unwrap().reset_all();
        assert_eq!(executions.get(), 1);
        assert_eq!(s.filter.visible_len(), 2);
        assert!(s.filter.column_filters().iter().all(|cf| !cf.is_filtered()));
    }

    #[test]
    fn test_selection_shared_across_consumers() {
        let s = session(vec![order(1, "Widget", "North", 10), order(2, "Widget", "South", 3)]);
        let products = s.filter.column_filter(s.product.id()).unwrap();
        let panel = products.panel().unwrap();

        let from_panel = panel.items()[0].filter_value().clone();
        let from_filter = products.filter_value(&ColumnValue::from("Widget")).unwrap();
        assert!(from_panel.ptr_eq(&from_filter));

        from_filter.set_selected(false);
        assert!(!panel.items()[0].is_checked());
        assert!(s.filter.is_row_visible(&order(9, "Widget", "West", 0)));

        s.filter.execute_filter();
        assert!(!s.filter.is_row_visible(&order(9, "Widget", "West", 0)));
        assert_eq!(s.filter.visible_len(), 0);
    }

    #[test]
    fn test_owner_dropped() {
        let s = session(vec![order(1, "Widget", "North", 10)]);
        let products = s.filter.column_filter(s.product.id()).unwrap();
        let panel = products.panel().unwrap();
        drop(s.filter);

        // Actions on an orphaned panel are logged and ignored
        panel.apply();
        panel.reset_all();
        assert!(products.table_filter().is_none());
    }
}
