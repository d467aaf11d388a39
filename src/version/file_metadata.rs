use crate::key::InternalKey;

/// Metadata for a single table file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetaData {
    /// File number (used in filename: {number}.sst)
    pub number: u64,
    /// File size in bytes
    pub file_size: u64,
    /// Smallest internal key in this file, possibly a range tombstone start
    pub smallest: InternalKey,
    /// Largest internal key in this file, possibly a range tombstone end
    pub largest: InternalKey,
}

impl FileMetaData {
    pub fn new(number: u64, file_size: u64, smallest: InternalKey, largest: InternalKey) -> Self {
        FileMetaData {
            number,
            file_size,
            smallest,
            largest,
        }
    }
}
