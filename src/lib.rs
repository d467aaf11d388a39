//! Merged iteration over the sorted, non-overlapping tables of one LSM-tree
//! level.
//!
//! The entry point is [`LevelIterator`], usually obtained from
//! [`Version::new_level_iterator`] with a [`TableCache`] as the table opener.

pub mod cache;
pub mod iterator;
pub mod key;
pub mod options;
pub mod range_del;
pub mod statistics;
pub mod table;
pub mod util;
pub mod version;

pub use cache::TableCache;
pub use iterator::{InternalIterator, LevelIterator, TableIterator};
pub use key::{InternalKey, InternalKeyComparator, MAX_SEQUENCE_NUMBER, ValueType};
pub use options::ReadOptions;
pub use range_del::{RangeDelAggregator, RangeDelLevel, RangeTombstone};
pub use statistics::{Statistics, StatisticsSnapshot};
pub use table::{Table, TableBuilder, TableOpener};
pub use util::{BytewiseComparator, Comparator, Result, ReverseBytewiseComparator, Slice, Status};
pub use version::{FileMetaData, NUM_LEVELS, Version};
