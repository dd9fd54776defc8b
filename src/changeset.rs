/// Changeset - Incremental Change Propagation for row sources
///
/// When a row source is modified, views do not rebuild from scratch. They
/// receive the changes describing what happened and update their own
/// bookkeeping from them.
///
/// # Change Types
///
/// - `Inserted`: A new row was added at a specific index
/// - `Removed`: A row was removed from a specific index
/// - `Replaced`: The row at an index was swapped for another
///
/// Every change carries the rows it concerns. A view can apply a change
/// without reading the source back, which keeps it correct when further
/// changes are queued behind the one being delivered.

use std::rc::Rc;

/// Represents a single change to a row source
#[derive(Debug)]
pub enum RowChange<R> {
    /// A row was inserted at the given index
    Inserted { index: usize, row: Rc<R> },

    /// A row was removed from the given index
    Removed { index: usize, row: Rc<R> },

    /// The row at the given index was replaced
    Replaced { index: usize, old: Rc<R>, new: Rc<R> },
}

// Derived Clone would require R: Clone
impl<R> Clone for RowChange<R> {
    fn clone(&self) -> Self {
        match self {
            RowChange::Inserted { index, row } => RowChange::Inserted {
                index: *index,
                row: Rc::clone(row),
            },
            RowChange::Removed { index, row } => RowChange::Removed {
                index: *index,
                row: Rc::clone(row),
            },
            RowChange::Replaced { index, old, new } => RowChange::Replaced {
                index: *index,
                old: Rc::clone(old),
                new: Rc::clone(new),
            },
        }
    }
}

/// An ordered buffer of changes waiting to be delivered to views
#[derive(Debug)]
pub struct Changeset<R> {
    changes: Vec<RowChange<R>>,
    /// Incremented each time the buffer is drained
    generation: u64,
}

impl<R> Default for Changeset<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Changeset<R> {
    pub fn new() -> Self {
        Changeset {
            changes: Vec::new(),
            generation: 0,
        }
    }

    /// Add a change to the changeset
    pub fn push(&mut self, change: RowChange<R>) {
        self.changes.push(change);
    }

    /// Returns the current generation number
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if there are no pending changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Drain changes, returning ownership and clearing the buffer
    pub fn drain(&mut self) -> Vec<RowChange<R>> {
        self.generation += 1;
        std::mem::take(&mut self.changes)
    }
}

/// Trait for views that maintain derived state over a row source.
///
/// Methods take `&self`: a view may be reached again (for reads) while it is
/// processing a change, so it keeps its state behind interior mutability and
/// never holds a borrow across a callback.
pub trait IncrementalView<R> {
    /// Apply a set of changes from the source, in order, and record
    /// `generation` as the last synced one.
    /// Returns true if the view was modified.
    fn apply_changes(&self, changes: &[RowChange<R>], generation: u64) -> bool;

    /// Get the source generation this view last synced to
    fn last_synced_generation(&self) -> u64;

    /// Discard derived state and recompute it from `rows`
    fn rebuild(&self, rows: &[Rc<R>], generation: u64);
}

/// Helper to adjust indices after an insert or delete
///
/// When a row is inserted at index I, all view indices >= I need to be incremented.
/// When a row is deleted at index I, all view indices > I need to be decremented,
/// and any index == I needs to be removed.
pub struct IndexAdjuster;

impl IndexAdjuster {
    /// Adjust a source index after a row insertion
    pub fn adjust_for_insert(source_index: usize, insert_index: usize) -> usize {
        if source_index >= insert_index {
            source_index + 1
        } else {
            source_index
        }
    }

    /// Adjust an entire index mapping for an insert
    pub fn adjust_mapping_for_insert(mapping: &mut [usize], insert_index: usize) {
        for source_idx in mapping.iter_mut() {
            *source_idx = Self::adjust_for_insert(*source_idx, insert_index);
        }
    }

    /// Adjust an entire index mapping for a delete, dropping the entry that
    /// pointed at the deleted row. Returns the view position that was removed.
    pub fn adjust_mapping_for_delete(
        mapping: &mut Vec<usize>,
        delete_index: usize,
    ) -> Option<usize> {
        let removed = mapping.iter().position(|&idx| idx == delete_index);
        if let Some(pos) = removed {
            mapping.remove(pos);
        }
        for source_idx in mapping.iter_mut() {
            if *source_idx > delete_index {
                *source_idx -= 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changeset_drain() {
        let mut cs = Changeset::new();
        assert!(cs.is_empty());
        assert_eq!(cs.generation(), 0);

        cs.push(RowChange::Inserted { index: 0, row: Rc::new(1) });
        cs.push(RowChange::Removed { index: 0, row: Rc::new(1) });
        assert!(!cs.is_empty());

        let drained = cs.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[1], RowChange::Removed { index: 0, .. }));
        assert!(cs.is_empty());
        assert_eq!(cs.generation(), 1);

        assert!(cs.drain().is_empty());
        assert_eq!(cs.generation(), 2);
    }

    #[test]
    fn test_clone_shares_rows() {
        let row = Rc::new("a");
        let change = RowChange::Replaced { index: 3, old: Rc::clone(&row), new: Rc::new("b") };
        let RowChange::Replaced { old, .. } = change.clone() else {
            panic!("clone changed the variant");
        };
        assert!(Rc::ptr_eq(&old, &row));
    }

    #[test]
    fn test_index_adjuster_insert() {
        assert_eq!(IndexAdjuster::adjust_for_insert(0, 2), 0);
        assert_eq!(IndexAdjuster::adjust_for_insert(1, 2), 1);
        assert_eq!(IndexAdjuster::adjust_for_insert(2, 2), 3);
        assert_eq!(IndexAdjuster::adjust_for_insert(3, 2), 4);
    }

    #[test]
    fn test_mapping_adjust_for_insert() {
        let mut mapping = vec![0, 2, 5, 7];
        IndexAdjuster::adjust_mapping_for_insert(&mut mapping, 3);
        assert_eq!(mapping, vec![0, 2, 6, 8]);
    }

    #[test]
    fn test_mapping_adjust_for_delete() {
        let mut mapping = vec![0, 2, 3, 5, 7];
        let removed = IndexAdjuster::adjust_mapping_for_delete(&mut mapping, 3);
        assert_eq!(removed, Some(2));
        assert_eq!(mapping, vec![0, 2, 4, 6]);

        // Row not in the mapping: only shifts
        let removed = IndexAdjuster::adjust_mapping_for_delete(&mut mapping, 1);
        assert_eq!(removed, None);
        assert_eq!(mapping, vec![0, 1, 3, 5]);
    }
}
