#[allow(clippy::module_inception)]
pub mod table;
pub mod table_builder;

pub use table::{Entry, Table};
pub use table_builder::TableBuilder;

use crate::{
    iterator::InternalIterator, options::ReadOptions, util::Result, version::FileMetaData,
};

/// Opens per-file iterators on behalf of a level iterator
///
/// Implementations may block on I/O. There is no cancellation at this layer;
/// an opener that needs timeouts or retries has to provide them itself.
pub trait TableOpener: Send + Sync {
    /// Open an iterator over the point entries of `file`, honouring the
    /// bounds in `opts`
    fn open_table(&self, file: &FileMetaData, opts: &ReadOptions)
    -> Result<Box<dyn InternalIterator>>;

    /// Open an iterator over the range tombstones of `file`
    fn open_range_del_table(&self, file: &FileMetaData) -> Result<Box<dyn InternalIterator>>;
}
