/// Filter Panel Example
///
/// This example demonstrates:
/// - Attaching a TableFilter to a table of orders
/// - Opening a column's filter panel from its header
/// - Searching, unchecking values and applying the filter
/// - Rows changing underneath an applied filter
/// - Resetting one column and resetting everything
///
/// Run with `RUST_LOG=debug` to see the filter's log output.

use std::rc::Rc;
use tablefilter::{
    ColumnValue, FilterPanel, FilterPanelConfig, HeaderCell, HeaderLayout, RowSource, TableColumn, TableFilter,
    TableView,
};

#[derive(Debug, Clone)]
struct Order {
    id: u32,
    product: &'static str,
    category: &'static str,
    quantity: i32,
}

fn print_visible(filter: &TableFilter<Order>) {
    for order in filter.visible_rows() {
        println!(
            "   #{:<3} {:<10} {:<12} {:>3}",
            order.id, order.product, order.category, order.quantity
        );
    }
    println!("   ({} row(s) visible)\n", filter.visible_len());
}

fn print_panel(panel: &FilterPanel<Order>) {
    let labels = panel.labels();
    println!("   [{}: '{}']", labels.search_prompt, panel.search_text());
    for item in panel.items() {
        println!("   [{}] {}", if item.is_checked() { "x" } else { " " }, item.label());
    }
    println!("   {} | {} | {}\n", labels.apply, labels.reset, labels.reset_all);
}

fn main() {
    env_logger::init();

    println!("=== TableFilter Panel Example ===\n");

    // 1. Build the table
    println!("1. Creating orders table...");
    let rows = Rc::new(RowSource::from_rows(vec![
        Order { id: 1, product: "Laptop", category: "Electronics", quantity: 5 },
        Order { id: 2, product: "Mouse", category: "Electronics", quantity: 20 },
        Order { id: 3, product: "Desk", category: "Furniture", quantity: 3 },
        Order { id: 4, product: "Chair", category: "Furniture", quantity: 8 },
        Order { id: 5, product: "Monitor", category: "Electronics", quantity: 10 },
        Order { id: 6, product: "Lamp", category: "Lighting", quantity: 8 },
    ]));
    let product = TableColumn::new("product", |o: &Order| ColumnValue::from(o.product));
    let category = TableColumn::new("category", |o: &Order| ColumnValue::from(o.category));
    let quantity = TableColumn::new("quantity", |o: &Order| ColumnValue::Int32(o.quantity));
    let table = TableView::new(
        Rc::clone(&rows),
        vec![Rc::clone(&product), Rc::clone(&category), Rc::clone(&quantity)],
    );

    let json = r#"{ "search_prompt": "Find...", "case_sensitive_search": false }"#;
    let config = match FilterPanelConfig::from_json(json) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad configuration: {}", e);
            return;
        }
    };
    let filter = TableFilter::with_config(Rc::clone(&table), config);
    print_visible(&filter);

    // 2. The renderer installs a nested header: [Item: product, category] quantity
    println!("2. Installing header layout...");
    let root = HeaderCell::nested(
        None,
        vec![
            HeaderCell::nested(
                None,
                vec![HeaderCell::leaf(product.id()), HeaderCell::leaf(category.id())],
            ),
            HeaderCell::leaf(quantity.id()),
        ],
    );
    table.set_header_layout(Some(Rc::clone(&root)));

    // 3. Right-click the category header
    println!("3. Opening the category filter...");
    let Some(header) = root.find_leaf_header_for(category.id()) else {
        eprintln!("category header missing");
        return;
    };
    header.request_context_menu(120.0, 18.0);
    let Some(menu) = category.context_menu() else {
        eprintln!("category has no context menu");
        return;
    };
    println!("   Menu showing: {:?}", menu.placement());
    let panel = Rc::clone(menu.items()[0].content());
    print_panel(&panel);

    // 4. Search and uncheck
    println!("4. Searching for 'TURE' and unchecking Furniture...");
    panel.set_search_text("TURE");
    print_panel(&panel);
    for item in panel.items() {
        item.set_checked(false);
    }
    panel.apply();
    menu.hide();
    print_visible(&filter);

    // 5. Rows change underneath the applied filter
    println!("5. Adding a sofa and a speaker, replacing the lamp...");
    rows.push(Order { id: 7, product: "Sofa", category: "Furniture", quantity: 1 });
    rows.push(Order { id: 8, product: "Speaker", category: "Audio", quantity: 4 });
    let lamp = Order { id: 6, product: "Lamp", category: "Furniture", quantity: 8 };
    if let Err(e) = rows.set(5, lamp) {
        eprintln!("replace failed: {}", e);
    }
    print_panel(&panel);
    print_visible(&filter);

    // 6. Narrow by quantity too
    println!("6. Unchecking quantity 8...");
    if let Some(quantities) = filter.column_filter(quantity.id()) {
        if let Some(eight) = quantities.filter_value(&ColumnValue::Int32(8)) {
            eight.set_selected(false);
        }
        if let Some(quantity_panel) = quantities.panel() {
            quantity_panel.apply();
        }
    }
    print_visible(&filter);

    // 7. Reset
    println!("7. Resetting category only (no recompute until APPLY)...");
    panel.reset();
    print_panel(&panel);
    print_visible(&filter);

    println!("8. Reset all...");
    panel.reset_all();
    print_visible(&filter);

    println!("=== Example Complete ===");
    println!("Filter executed {} time(s)", filter.execution_count());
}
