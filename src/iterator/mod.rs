//! Iterator module
//!
//! Provides the iterator contract shared by everything that yields internal
//! keys in sorted order:
//! - `TableIterator` over the entries of a single table
//! - `LevelIterator` over all tables of one level
//!
//! # Architecture
//!
//! ```text
//! merging iterator (one child per level, outside this crate)
//!     ├─→ memtable iterators
//!     └─→ LevelIterator (L1..Ln)
//!             └─→ TableIterator (at most one open at a time)
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Lazy**: a level opens a table only when iteration reaches it
//! 2. **Bidirectional**: every iterator supports forward and backward travel
//! 3. **Sticky errors**: once an iterator fails it stays invalid and reports
//!    the first error through `error()`

use crate::{
    key::InternalKey,
    util::{Result, Slice, Status},
};

/// Iterator over internal keys in sorted order
///
/// # Lifecycle
///
/// An iterator starts unpositioned. Call one of the positioning methods
/// before reading:
///
/// ```ignore
/// let mut iter = level_iter;
/// iter.first();
/// while iter.valid() {
///     println!("{}: {:?}", iter.key(), iter.value());
///     iter.next();
/// }
/// iter.close()?;
/// ```
///
/// # Error Handling
///
/// Positioning methods do not return errors. A failed iterator becomes
/// invalid and the failure is reported by `error()` and `close()`.
pub trait InternalIterator {
    /// Position at the first entry whose user key is >= `key`
    ///
    /// Returns true if positioned at a valid entry
    fn seek_ge(&mut self, key: &Slice) -> bool;

    /// Position at the last entry whose user key is < `key`
    ///
    /// Returns true if positioned at a valid entry
    fn seek_lt(&mut self, key: &Slice) -> bool;

    /// Position at the first entry
    fn first(&mut self) -> bool;

    /// Position at the last entry
    fn last(&mut self) -> bool;

    /// Move to the next entry
    ///
    /// Returns false once the end is reached or an error occurred
    fn next(&mut self) -> bool;

    /// Move to the previous entry
    ///
    /// Returns false once the start is reached or an error occurred
    fn prev(&mut self) -> bool;

    /// Current key, or `InternalKey::invalid()` when not positioned
    fn key(&self) -> InternalKey;

    /// Current value, empty when not positioned
    fn value(&self) -> Slice;

    fn valid(&self) -> bool;

    /// Error recorded by this iterator, if any. Never performs I/O.
    fn error(&self) -> Option<Status>;

    /// Release resources held by the iterator
    fn close(&mut self) -> Result<()>;
}

mod level_iterator;
mod table_iterator;

pub use level_iterator::LevelIterator;
pub use table_iterator::TableIterator;
