/// Table filter
///
/// A `TableFilter` owns one `ColumnFilter` per table column and decides row
/// visibility from their selection state. Selection changes alone do not
/// hide or show anything: the visible set is recomputed only when
/// `execute_filter` runs (the APPLY and RESET ALL actions call it), and is
/// then kept current incrementally as rows change.
///
/// A row is visible iff, for every column, its cell value was not deselected
/// at the last execution. Values a column has never seen count as selected.
///
/// # Examples
///
/// ```
/// use tablefilter::{ColumnValue, RowSource, TableColumn, TableFilter, TableFilterHost, TableView};
/// use std::rc::Rc;
///
/// let rows = Rc::new(RowSource::from_rows(vec!["A", "B", "A", "C"]));
/// let letter = TableColumn::new("letter", |r: &&'static str| ColumnValue::from(*r));
/// let table = TableView::new(rows, vec![letter.clone()]);
/// let filter = TableFilter::for_table(table);
///
/// let column_filter = filter.column_filter(letter.id()).unwrap();
/// column_filter.filter_value(&ColumnValue::from("B")).unwrap().set_selected(false);
/// assert_eq!(filter.visible_len(), 4);
///
/// filter.execute_filter();
/// assert_eq!(filter.visible_indices(), vec![0, 2, 3]);
/// ```

use crate::changeset::{IncrementalView, IndexAdjuster, RowChange};
use crate::column::{ColumnId, TableColumn};
use crate::column_filter::ColumnFilter;
use crate::config::FilterPanelConfig;
use crate::observer::{Listeners, SubscriptionId};
use crate::row_source::RowSource;
use crate::table::TableView;
use crate::value::ColumnValue;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// What column filters and panels need from the filter that owns them
pub trait TableFilterHost<R> {
    fn table(&self) -> Rc<TableView<R>>;

    /// The rows every column filter projects
    fn backing_list(&self) -> Rc<RowSource<R>> {
        self.table().items()
    }

    fn config(&self) -> FilterPanelConfig;

    fn column_filters(&self) -> Vec<Rc<ColumnFilter<R>>>;

    /// Recompute row visibility from the current selection state.
    fn execute_filter(&self);
}

/// Deselected values per column, captured at execution time
struct RowPredicate<R> {
    excluded: Vec<(Rc<TableColumn<R>>, HashSet<ColumnValue>)>,
}

impl<R: 'static> RowPredicate<R> {
    fn accept_all() -> Self {
        RowPredicate { excluded: Vec::new() }
    }

    fn snapshot(column_filters: &[Rc<ColumnFilter<R>>]) -> Self {
        let excluded = column_filters
            .iter()
            .map(|cf| (Rc::clone(cf.column()), cf.deselected_values()))
            .filter(|(_, deselected)| !deselected.is_empty())
            .collect();
        RowPredicate { excluded }
    }

    fn accepts(&self, row: &R) -> bool {
        self.excluded
            .iter()
            .all(|(column, deselected)| !deselected.contains(&column.cell_value(row)))
    }
}

/// Source indices of the rows passing the current predicate, kept sorted
struct VisibleRows<R> {
    predicate: RefCell<RowPredicate<R>>,
    view_to_source: RefCell<Vec<usize>>,
    last_synced_generation: Cell<u64>,
}

impl<R: 'static> VisibleRows<R> {
    fn new() -> Self {
        VisibleRows {
            predicate: RefCell::new(RowPredicate::accept_all()),
            view_to_source: RefCell::new(Vec::new()),
            last_synced_generation: Cell::new(0),
        }
    }

    fn insert_sorted(mapping: &mut Vec<usize>, index: usize) {
        let pos = mapping
            .iter()
            .position(|&source_idx| source_idx > index)
            .unwrap_or(mapping.len());
        mapping.insert(pos, index);
    }
}

impl<R: 'static> IncrementalView<R> for VisibleRows<R> {
    fn apply_changes(&self, changes: &[RowChange<R>], generation: u64) -> bool {
        let predicate = self.predicate.borrow();
        let mut mapping = self.view_to_source.borrow_mut();
        let mut modified = false;

        for change in changes {
            match change {
                RowChange::Inserted { index, row } => {
                    IndexAdjuster::adjust_mapping_for_insert(&mut mapping, *index);
                    if predicate.accepts(row) {
                        Self::insert_sorted(&mut mapping, *index);
                        modified = true;
                    }
                }
                RowChange::Removed { index, .. } => {
                    if IndexAdjuster::adjust_mapping_for_delete(&mut mapping, *index).is_some() {
                        modified = true;
                    }
                }
                RowChange::Replaced { index, new, .. } => {
                    let currently_visible = mapping.binary_search(index);
                    match (currently_visible, predicate.accepts(new)) {
                        (Err(_), true) => {
                            Self::insert_sorted(&mut mapping, *index);
                            modified = true;
                        }
                        (Ok(pos), false) => {
                            mapping.remove(pos);
                            modified = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        self.last_synced_generation.set(generation);
        modified
    }

    fn last_synced_generation(&self) -> u64 {
        self.last_synced_generation.get()
    }

    fn rebuild(&self, rows: &[Rc<R>], generation: u64) {
        let predicate = self.predicate.borrow();
        let mapping: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.accepts(row))
            .map(|(i, _)| i)
            .collect();
        *self.view_to_source.borrow_mut() = mapping;
        self.last_synced_generation.set(generation);
    }
}

pub struct TableFilter<R> {
    this: Weak<TableFilter<R>>,
    table: Rc<TableView<R>>,
    config: FilterPanelConfig,
    column_filters: RefCell<Vec<Rc<ColumnFilter<R>>>>,
    visible: Rc<VisibleRows<R>>,
    executions: Cell<usize>,
    executed_listeners: Listeners<dyn Fn(usize)>,
}

impl<R: 'static> TableFilter<R> {
    pub fn for_table(table: Rc<TableView<R>>) -> Rc<Self> {
        Self::with_config(table, FilterPanelConfig::default())
    }

    /// Build a filter with one column filter per table column.
    pub fn with_config(table: Rc<TableView<R>>, config: FilterPanelConfig) -> Rc<Self> {
        let filter = Rc::new_cyclic(|this| TableFilter {
            this: this.clone(),
            table,
            config,
            column_filters: RefCell::new(Vec::new()),
            visible: Rc::new(VisibleRows::new()),
            executions: Cell::new(0),
            executed_listeners: Listeners::new(),
        });

        let visible: Weak<dyn IncrementalView<R>> =
            Rc::downgrade(&filter.visible) as Weak<dyn IncrementalView<R>>;
        filter.table.items().register_view(visible);

        // Column filters hold their owner weakly, so the owner must exist first
        let host: Rc<dyn TableFilterHost<R>> = filter.clone();
        let column_filters: Vec<Rc<ColumnFilter<R>>> = filter
            .table
            .columns()
            .iter()
            .map(|column| ColumnFilter::new(&host, Rc::clone(column)))
            .collect();
        log::debug!("table filter created over {} column(s)", column_filters.len());
        *filter.column_filters.borrow_mut() = column_filters;

        filter
    }

    pub fn column_filter(&self, column: ColumnId) -> Option<Rc<ColumnFilter<R>>> {
        self.column_filters
            .borrow()
            .iter()
            .find(|cf| cf.column().id() == column)
            .cloned()
    }

    /// Select every value of every column, then recompute once.
    pub fn reset_all(&self) {
        for column_filter in self.column_filters() {
            column_filter.reset();
        }
        self.execute_filter();
    }

    /// Rows visible as of the last execution, in source order
    pub fn visible_rows(&self) -> Vec<Rc<R>> {
        let source = self.table.items();
        self.visible
            .view_to_source
            .borrow()
            .iter()
            .filter_map(|&i| source.get(i))
            .collect()
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible.view_to_source.borrow().clone()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.view_to_source.borrow().len()
    }

    pub fn is_row_visible(&self, row: &R) -> bool {
        self.visible.predicate.borrow().accepts(row)
    }

    /// Number of times the filter has been executed
    pub fn execution_count(&self) -> usize {
        self.executions.get()
    }

    /// Register a callback run after each execution with the visible row count.
    pub fn on_filter_executed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(usize) + 'static,
    {
        self.executed_listeners.add(Rc::new(listener))
    }

    pub fn remove_filter_executed_listener(&self, id: SubscriptionId) -> bool {
        self.executed_listeners.remove(id)
    }
}

impl<R: 'static> TableFilterHost<R> for TableFilter<R> {
    fn table(&self) -> Rc<TableView<R>> {
        Rc::clone(&self.table)
    }

    fn config(&self) -> FilterPanelConfig {
        self.config.clone()
    }

    fn column_filters(&self) -> Vec<Rc<ColumnFilter<R>>> {
        self.column_filters.borrow().clone()
    }

    fn execute_filter(&self) {
        let predicate = RowPredicate::snapshot(&self.column_filters());
        let this = self.this.clone();

        // Selection is captured now; the visible index is rebuilt once the
        // rows it sees match what the views have been told
        self.table.items().when_idle(move |source| {
            if let Some(filter) = this.upgrade() {
                filter.finish_execution(predicate, source);
            }
        });
    }
}

impl<R: 'static> TableFilter<R> {
    fn finish_execution(&self, predicate: RowPredicate<R>, source: &RowSource<R>) {
        let filtered_columns = predicate.excluded.len();
        *self.visible.predicate.borrow_mut() = predicate;
        self.visible.rebuild(&source.rows(), source.generation());
        self.executions.set(self.executions.get() + 1);

        let visible = self.visible_len();
        log::debug!(
            "filter executed: {} of {} row(s) visible, {} column(s) filtered",
            visible,
            source.len(),
            filtered_columns
        );
        for listener in self.executed_listeners.snapshot() {
            listener(visible);
        }
    }
}
