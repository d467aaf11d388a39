use std::{cmp::Ordering, sync::Arc};

use crate::{
    iterator::InternalIterator,
    key::InternalKey,
    table::Entry,
    util::{Comparator, Result, Slice, Status},
};

/// Iterator over the entries of one table
///
/// Entries outside `[lower, upper)` are never surfaced, so a table that
/// straddles a bound yields only its in-bound part and a table entirely
/// outside the bounds looks empty.
pub struct TableIterator {
    comparator: Arc<dyn Comparator>,
    entries: Arc<Vec<Entry>>,
    lower: Option<Slice>,
    upper: Option<Slice>,
    pos: Option<usize>,
}

impl TableIterator {
    pub fn new(
        comparator: Arc<dyn Comparator>,
        entries: Arc<Vec<Entry>>,
        lower: Option<Slice>,
        upper: Option<Slice>,
    ) -> Self {
        TableIterator {
            comparator,
            entries,
            lower,
            upper,
            pos: None,
        }
    }

    #[inline]
    fn cmp_user_key(&self, index: usize, key: &[u8]) -> Ordering {
        self.comparator
            .compare(self.entries[index].0.user_key().data(), key)
    }

    /// Index of the first entry whose user key is >= `key`
    fn lower_index(&self, key: &[u8]) -> usize {
        self.entries.partition_point(|(k, _)| {
            self.comparator.compare(k.user_key().data(), key) == Ordering::Less
        })
    }

    fn in_bounds(&self, index: usize) -> bool {
        if let Some(lower) = &self.lower {
            if self.cmp_user_key(index, lower.data()) == Ordering::Less {
                return false;
            }
        }
        if let Some(upper) = &self.upper {
            if self.cmp_user_key(index, upper.data()) != Ordering::Less {
                return false;
            }
        }
        true
    }

    fn settle(&mut self, index: Option<usize>) -> bool {
        self.pos = index.filter(|&i| i < self.entries.len() && self.in_bounds(i));
        self.pos.is_some()
    }
}

impl InternalIterator for TableIterator {
    fn seek_ge(&mut self, key: &Slice) -> bool {
        let target = match &self.lower {
            Some(lower) if self.comparator.compare(key.data(), lower.data()) == Ordering::Less => {
                lower.clone()
            },
            _ => key.clone(),
        };
        let index = self.lower_index(target.data());
        self.settle(Some(index))
    }

    fn seek_lt(&mut self, key: &Slice) -> bool {
        let target = match &self.upper {
            Some(upper) if self.comparator.compare(key.data(), upper.data()) == Ordering::Greater => {
                upper.clone()
            },
            _ => key.clone(),
        };
        let index = self.lower_index(target.data()).checked_sub(1);
        self.settle(index)
    }

    fn first(&mut self) -> bool {
        let index = match &self.lower {
            Some(lower) => self.lower_index(lower.data()),
            None => 0,
        };
        self.settle(Some(index))
    }

    fn last(&mut self) -> bool {
        let index = match &self.upper {
            Some(upper) => self.lower_index(upper.data()).checked_sub(1),
            None => self.entries.len().checked_sub(1),
        };
        self.settle(index)
    }

    fn next(&mut self) -> bool {
        let index = self.pos.map(|i| i + 1);
        self.settle(index)
    }

    fn prev(&mut self) -> bool {
        let index = self.pos.and_then(|i| i.checked_sub(1));
        self.settle(index)
    }

    fn key(&self) -> InternalKey {
        match self.pos {
            Some(i) => self.entries[i].0.clone(),
            None => InternalKey::invalid(),
        }
    }

    fn value(&self) -> Slice {
        match self.pos {
            Some(i) => self.entries[i].1.clone(),
            None => Slice::empty(),
        }
    }

    fn valid(&self) -> bool {
        self.pos.is_some()
    }

    fn error(&self) -> Option<Status> {
        None
    }

    fn close(&mut self) -> Result<()> {
        self.pos = None;
        Ok(())
    }
}
