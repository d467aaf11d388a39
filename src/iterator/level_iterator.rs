use std::{cmp::Ordering, mem, sync::Arc};

use tracing::{debug, trace, warn};

use crate::{
    iterator::InternalIterator,
    key::InternalKey,
    options::ReadOptions,
    range_del::RangeDelAggregator,
    statistics::Statistics,
    table::TableOpener,
    util::{Comparator, Result, Slice, Status},
    version::FileMetaData,
};

/// Merged view of the tables in one level
///
/// The files of a level (L1 and up) are sorted and do not overlap, so the
/// level can be read as a concatenation of per-file iterators. Only one
/// per-file iterator is open at a time; it is opened when iteration reaches
/// the file and closed before the next one is opened.
///
/// # Boundary pauses
///
/// When range deletions are tracked (`init_range_del`), iteration pauses at
/// the edge of a file whose boundary key (`largest` going forward, `smallest`
/// going backward) is a range tombstone. The tombstone key itself is exposed
/// as the current entry with an empty value. This keeps a merging iterator
/// from moving past the file before the tombstone is the smallest (or
/// largest) key among all levels.
///
/// ```text
///   files:   [a b c)RANGEDEL   [f g]
///   next():   a  b  c#MAX,RANGEDEL  f  g
/// ```
///
/// # Bounds
///
/// Files entirely outside `[lower, upper)` are never opened. Seek keys are
/// expected to be clamped to the bounds by the caller.
///
/// # Errors
///
/// The first error is sticky: every later positioning call fails without
/// I/O and `error()` returns it. `close()` still closes an open file.
pub struct LevelIterator {
    opts: ReadOptions,
    comparator: Arc<dyn Comparator>,
    opener: Arc<dyn TableOpener>,
    files: Arc<[FileMetaData]>,
    range_del: Option<Arc<dyn RangeDelAggregator>>,
    statistics: Option<Arc<Statistics>>,
    pos: Position,
}

/// Where the level iterator currently stands.
///
/// An open per-file iterator and a held boundary key are mutually exclusive.
enum Position {
    Unpositioned,
    Positioned {
        index: usize,
        iter: Box<dyn InternalIterator>,
    },
    Boundary {
        index: usize,
        key: InternalKey,
    },
    ExhaustedBefore,
    ExhaustedAfter,
    Errored(Status),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Neighbour of `index` in this direction, `None` past either end
    fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Forward => Some(index + 1).filter(|&i| i < len),
            Direction::Backward => index.checked_sub(1),
        }
    }

    fn exhausted(self) -> Position {
        match self {
            Direction::Forward => Position::ExhaustedAfter,
            Direction::Backward => Position::ExhaustedBefore,
        }
    }
}

/// Placement of a file relative to the iterator bounds
enum FilePlacement {
    Inside,
    BelowLower,
    AboveUpper,
}

impl LevelIterator {
    /// Create an iterator over `files`, which must be sorted by key and
    /// non-overlapping under `comparator`.
    pub fn new(
        opts: ReadOptions,
        comparator: Arc<dyn Comparator>,
        opener: Arc<dyn TableOpener>,
        files: impl Into<Arc<[FileMetaData]>>,
    ) -> Self {
        LevelIterator {
            opts,
            comparator,
            opener,
            files: files.into(),
            range_del: None,
            statistics: None,
            pos: Position::Unpositioned,
        }
    }

    /// Track range deletions: every loaded file's tombstones are handed to
    /// `aggregator`, and iteration pauses at tombstone file boundaries.
    pub fn init_range_del(&mut self, aggregator: Arc<dyn RangeDelAggregator>) {
        self.range_del = Some(aggregator);
    }

    pub fn set_statistics(&mut self, statistics: Arc<Statistics>) {
        self.statistics = Some(statistics);
    }

    /// Replace the iteration bounds. Takes effect at the next file load.
    pub fn set_bounds(&mut self, lower: Option<Slice>, upper: Option<Slice>) {
        self.opts.iterate_lower_bound = lower;
        self.opts.iterate_upper_bound = upper;
    }

    /// File the iterator is positioned in, including a boundary pause
    pub fn current_file(&self) -> Option<&FileMetaData> {
        match &self.pos {
            Position::Positioned { index, .. } | Position::Boundary { index, .. } => {
                self.files.get(*index)
            },
            _ => None,
        }
    }

    /// Index of the first file whose largest user key is >= `key`, or the
    /// number of files if there is none
    pub fn find_file_ge(&self, key: &[u8]) -> usize {
        self.files.partition_point(|f| {
            self.comparator.compare(f.largest.user_key().data(), key) == Ordering::Less
        })
    }

    /// Index of the last file whose smallest user key is < `key`
    pub fn find_file_lt(&self, key: &[u8]) -> Option<usize> {
        self.files
            .partition_point(|f| {
                self.comparator.compare(f.smallest.user_key().data(), key) == Ordering::Less
            })
            .checked_sub(1)
    }

    fn placement(&self, file: &FileMetaData) -> FilePlacement {
        if let Some(lower) = self.opts.lower_bound() {
            if self.comparator.compare(file.largest.user_key().data(), lower) == Ordering::Less {
                return FilePlacement::BelowLower;
            }
        }
        if let Some(upper) = self.opts.upper_bound() {
            if self.comparator.compare(file.smallest.user_key().data(), upper) != Ordering::Less {
                return FilePlacement::AboveUpper;
            }
        }
        FilePlacement::Inside
    }

    fn is_errored(&self) -> bool {
        matches!(self.pos, Position::Errored(_))
    }

    fn record_error(&mut self, err: Status) {
        warn!(error = %err, "level iterator failed");
        if let Some(stats) = &self.statistics {
            stats.record_error();
        }
        self.pos = Position::Errored(err);
    }

    fn iter_mut(&mut self) -> Option<&mut Box<dyn InternalIterator>> {
        match &mut self.pos {
            Position::Positioned { iter, .. } => Some(iter),
            _ => None,
        }
    }

    /// Make the first file at or after `target` (in `dir`) that overlaps the
    /// bounds the current file. An already open iterator on `target` is
    /// reused as is.
    fn load_file(&mut self, target: Option<usize>, dir: Direction) -> bool {
        match mem::replace(&mut self.pos, Position::Unpositioned) {
            Position::Positioned { index, iter } if Some(index) == target => {
                self.pos = Position::Positioned { index, iter };
                return true;
            },
            Position::Positioned { iter, .. } => {
                if let Err(err) = retire(iter) {
                    self.record_error(err);
                    return false;
                }
            },
            Position::Errored(err) => {
                self.pos = Position::Errored(err);
                return false;
            },
            _ => {},
        }

        let files = self.files.clone();
        let mut next = target;
        while let Some(index) = next {
            let Some(file) = files.get(index) else {
                break;
            };

            match (self.placement(file), dir) {
                (FilePlacement::Inside, _) => return self.open_file(index),
                // Nothing before a file below the lower bound can be inside
                // the bounds either, and likewise for the upper bound.
                (FilePlacement::BelowLower, Direction::Backward)
                | (FilePlacement::AboveUpper, Direction::Forward) => break,
                _ => {
                    debug!(file = file.number, index, "skipping table outside bounds");
                    if let Some(stats) = &self.statistics {
                        stats.record_file_skipped();
                    }
                    next = dir.step(index, files.len());
                },
            }
        }

        self.pos = dir.exhausted();
        false
    }

    fn open_file(&mut self, index: usize) -> bool {
        let files = self.files.clone();
        let file = &files[index];

        let mut iter = match self.opener.open_table(file, &self.opts) {
            Ok(iter) => iter,
            Err(err) => {
                self.record_error(err);
                return false;
            },
        };
        debug!(file = file.number, index, "opened table");
        if let Some(stats) = &self.statistics {
            stats.record_file_opened();
        }

        if let Some(range_del) = self.range_del.clone() {
            match self.opener.open_range_del_table(file) {
                Ok(range_del_iter) => {
                    if let Some(stats) = &self.statistics {
                        stats.record_range_del_file_opened();
                    }
                    range_del.init(range_del_iter);
                },
                Err(err) => {
                    // The tombstone failure is what gets reported.
                    if let Err(close_err) = iter.close() {
                        debug!(file = file.number, error = %close_err, "failed to close table");
                    }
                    self.record_error(err);
                    return false;
                },
            }
        }

        self.pos = Position::Positioned { index, iter };
        true
    }

    fn position_at_edge(&mut self, dir: Direction) {
        if let Some(iter) = self.iter_mut() {
            match dir {
                Direction::Forward => iter.first(),
                Direction::Backward => iter.last(),
            };
        }
    }

    /// Load `target` and position at its first (forward) or last (backward)
    /// entry, moving on past files with nothing in bounds
    fn resume(&mut self, target: Option<usize>, dir: Direction) -> bool {
        if !self.load_file(target, dir) {
            return false;
        }
        self.position_at_edge(dir);
        self.skip_empty_files(dir)
    }

    /// Move past exhausted files until a valid entry is found, a tombstone
    /// boundary is reached, or the level runs out.
    fn skip_empty_files(&mut self, dir: Direction) -> bool {
        loop {
            let (index, iter) = match mem::replace(&mut self.pos, Position::Unpositioned) {
                Position::Positioned { index, iter } if !iter.valid() => (index, iter),
                other => {
                    let valid = matches!(
                        other,
                        Position::Positioned { .. } | Position::Boundary { .. }
                    );
                    self.pos = other;
                    return valid;
                },
            };

            if let Err(err) = retire(iter) {
                self.record_error(err);
                return false;
            }

            if self.range_del.is_some() {
                let file = &self.files[index];
                let boundary = match dir {
                    Direction::Forward => &file.largest,
                    Direction::Backward => &file.smallest,
                };
                if boundary.is_range_deletion() {
                    trace!(file = file.number, key = %boundary, "pausing at tombstone boundary");
                    let key = boundary.clone();
                    if let Some(stats) = &self.statistics {
                        stats.record_boundary_pause();
                    }
                    self.pos = Position::Boundary { index, key };
                    return true;
                }
            }

            if !self.load_file(dir.step(index, self.files.len()), dir) {
                return false;
            }
            self.position_at_edge(dir);
        }
    }

    fn record_seek(&self) {
        if let Some(stats) = &self.statistics {
            stats.record_seek();
        }
    }
}

/// Close a per-file iterator, reporting its own error ahead of any close
/// failure.
fn retire(mut iter: Box<dyn InternalIterator>) -> Result<()> {
    let err = iter.error();
    let closed = iter.close();
    match err {
        Some(err) => Err(err),
        None => closed,
    }
}

impl InternalIterator for LevelIterator {
    fn seek_ge(&mut self, key: &Slice) -> bool {
        if self.is_errored() {
            return false;
        }
        self.record_seek();

        let index = self.find_file_ge(key.data());
        if !self.load_file(Some(index), Direction::Forward) {
            return false;
        }
        if let Some(iter) = self.iter_mut() {
            iter.seek_ge(key);
        }
        self.skip_empty_files(Direction::Forward)
    }

    fn seek_lt(&mut self, key: &Slice) -> bool {
        if self.is_errored() {
            return false;
        }
        self.record_seek();

        let index = self.find_file_lt(key.data());
        if !self.load_file(index, Direction::Backward) {
            return false;
        }
        if let Some(iter) = self.iter_mut() {
            iter.seek_lt(key);
        }
        self.skip_empty_files(Direction::Backward)
    }

    fn first(&mut self) -> bool {
        if self.is_errored() {
            return false;
        }
        self.record_seek();
        self.resume(Some(0), Direction::Forward)
    }

    fn last(&mut self) -> bool {
        if self.is_errored() {
            return false;
        }
        self.record_seek();
        let last = self.files.len().checked_sub(1);
        self.resume(last, Direction::Backward)
    }

    fn next(&mut self) -> bool {
        let len = self.files.len();
        match &mut self.pos {
            Position::Errored(_) | Position::ExhaustedAfter => false,
            Position::Positioned { iter, .. } => {
                if iter.next() {
                    return true;
                }
                self.skip_empty_files(Direction::Forward)
            },
            Position::Boundary { index, .. } => {
                let target = Direction::Forward.step(*index, len);
                self.resume(target, Direction::Forward)
            },
            // Off the start of the level: move onto the first entry.
            Position::Unpositioned | Position::ExhaustedBefore => {
                self.resume(Some(0), Direction::Forward)
            },
        }
    }

    fn prev(&mut self) -> bool {
        let len = self.files.len();
        match &mut self.pos {
            Position::Errored(_) | Position::ExhaustedBefore | Position::Unpositioned => false,
            Position::Positioned { iter, .. } => {
                if iter.prev() {
                    return true;
                }
                self.skip_empty_files(Direction::Backward)
            },
            Position::Boundary { index, .. } => {
                let target = Direction::Backward.step(*index, len);
                self.resume(target, Direction::Backward)
            },
            // Off the end of the level: move onto the last entry.
            Position::ExhaustedAfter => self.resume(len.checked_sub(1), Direction::Backward),
        }
    }

    fn key(&self) -> InternalKey {
        match &self.pos {
            Position::Positioned { iter, .. } => iter.key(),
            Position::Boundary { key, .. } => key.clone(),
            _ => InternalKey::invalid(),
        }
    }

    fn value(&self) -> Slice {
        match &self.pos {
            Position::Positioned { iter, .. } => iter.value(),
            _ => Slice::empty(),
        }
    }

    fn valid(&self) -> bool {
        match &self.pos {
            Position::Positioned { iter, .. } => iter.valid(),
            Position::Boundary { .. } => true,
            _ => false,
        }
    }

    fn error(&self) -> Option<Status> {
        match &self.pos {
            Position::Errored(err) => Some(err.clone()),
            Position::Positioned { iter, .. } => iter.error(),
            _ => None,
        }
    }

    fn close(&mut self) -> Result<()> {
        match mem::replace(&mut self.pos, Position::Unpositioned) {
            Position::Positioned { mut iter, .. } => {
                if let Err(err) = iter.close() {
                    self.record_error(err.clone());
                    return Err(err);
                }
                Ok(())
            },
            Position::Errored(err) => {
                self.pos = Position::Errored(err.clone());
                Err(err)
            },
            _ => Ok(()),
        }
    }
}

impl Drop for LevelIterator {
    fn drop(&mut self) {
        if let Some(iter) = self.iter_mut() {
            if let Err(err) = iter.close() {
                debug!(error = %err, "failed to close table on drop");
            }
        }
    }
}
