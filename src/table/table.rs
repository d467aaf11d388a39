use std::sync::Arc;

use crate::{
    iterator::TableIterator,
    key::InternalKey,
    options::ReadOptions,
    util::{Comparator, Slice},
};

/// One entry of a table: internal key and value
pub type Entry = (InternalKey, Slice);

/// An immutable, sorted table.
///
/// Point entries and range tombstones are kept apart, the same way a table
/// file keeps range deletions in their own meta block. Tombstones are stored
/// as `start#seq,RANGEDEL -> end`.
pub struct Table {
    number: u64,
    comparator: Arc<dyn Comparator>,
    entries: Arc<Vec<Entry>>,
    range_dels: Arc<Vec<Entry>>,
}

impl Table {
    pub(crate) fn new(
        number: u64,
        comparator: Arc<dyn Comparator>,
        entries: Vec<Entry>,
        range_dels: Vec<Entry>,
    ) -> Self {
        Table {
            number,
            comparator,
            entries: Arc::new(entries),
            range_dels: Arc::new(range_dels),
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn num_range_deletions(&self) -> usize {
        self.range_dels.len()
    }

    /// Iterator over point entries, restricted to the bounds in `opts`
    pub fn iter(&self, opts: &ReadOptions) -> TableIterator {
        TableIterator::new(
            self.comparator.clone(),
            self.entries.clone(),
            opts.iterate_lower_bound.clone(),
            opts.iterate_upper_bound.clone(),
        )
    }

    /// Iterator over the range tombstones of this table
    pub fn range_del_iter(&self) -> TableIterator {
        TableIterator::new(self.comparator.clone(), self.range_dels.clone(), None, None)
    }
}
