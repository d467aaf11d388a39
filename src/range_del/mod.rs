//! Range deletion tracking for a level
//!
//! A level iterator that tracks range deletions opens the tombstone iterator
//! of every table it loads and hands it to a `RangeDelAggregator`. The
//! aggregator is shared with the reader that consumes the merged view; how it
//! answers coverage questions is up to the implementation.

use parking_lot::Mutex;

use crate::{iterator::InternalIterator, util::Slice};

/// Receives the range tombstones of each table a level iterator loads
pub trait RangeDelAggregator: Send + Sync {
    /// Called once per loaded table with an unpositioned iterator over its
    /// tombstones (`start#seq,RANGEDEL -> end`)
    fn init(&self, iter: Box<dyn InternalIterator>);
}

/// A range tombstone deleting `[start, end)` as of `sequence`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTombstone {
    pub start: Slice,
    pub end: Slice,
    pub sequence: u64,
}

/// Tombstones of the table currently loaded in one level
#[derive(Debug, Default)]
pub struct RangeDelLevel {
    state: Mutex<LevelState>,
}

#[derive(Debug, Default)]
struct LevelState {
    tombstones: Vec<RangeTombstone>,
    inits: u64,
}

impl RangeDelLevel {
    pub fn new() -> Self {
        RangeDelLevel::default()
    }

    /// Tombstones from the most recent `init`
    pub fn tombstones(&self) -> Vec<RangeTombstone> {
        self.state.lock().tombstones.clone()
    }

    /// Number of times `init` was called
    pub fn init_count(&self) -> u64 {
        self.state.lock().inits
    }
}

impl RangeDelAggregator for RangeDelLevel {
    fn init(&self, mut iter: Box<dyn InternalIterator>) {
        let mut tombstones = Vec::new();
        let mut ok = iter.first();
        while ok {
            let key = iter.key();
            tombstones.push(RangeTombstone {
                start: key.user_key().clone(),
                end: iter.value(),
                sequence: key.sequence(),
            });
            ok = iter.next();
        }

        let read_err = iter.error();
        let close_err = iter.close().err();
        if let Some(err) = read_err.or(close_err) {
            tracing::warn!(error = %err, "failed to read range tombstones");
            tombstones.clear();
        }

        let mut state = self.state.lock();
        state.tombstones = tombstones;
        state.inits += 1;
    }
}
