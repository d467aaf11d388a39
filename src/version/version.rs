use std::sync::Arc;

use crate::{
    iterator::LevelIterator,
    key::InternalKeyComparator,
    options::ReadOptions,
    table::TableOpener,
    util::{Comparator, Result, Status},
    version::file_metadata::FileMetaData,
};

/// Maximum number of levels in LSM-Tree
pub const NUM_LEVELS: usize = 7;

/// A Version represents a snapshot of all tables organized by levels
///
/// Level 0: tables may have overlapping keys (from memtable flush)
/// Level 1+: tables have non-overlapping keys, sorted by smallest key
pub struct Version {
    icmp: InternalKeyComparator,
    /// Files at each level
    files: Vec<Vec<FileMetaData>>,
}

impl Version {
    pub fn new(comparator: Arc<dyn Comparator>) -> Self {
        Version {
            icmp: InternalKeyComparator::new(comparator),
            files: vec![Vec::new(); NUM_LEVELS],
        }
    }

    pub fn comparator(&self) -> &Arc<dyn Comparator> {
        self.icmp.user_comparator()
    }

    /// Get total number of files across all levels
    pub fn num_files(&self) -> usize {
        self.files.iter().map(|level| level.len()).sum()
    }

    /// Get number of files at a specific level
    pub fn num_level_files(&self, level: usize) -> usize {
        self.level_files(level).len()
    }

    /// Get files at a specific level
    pub fn level_files(&self, level: usize) -> &[FileMetaData] {
        if level < NUM_LEVELS {
            &self.files[level]
        } else {
            &[]
        }
    }

    /// Add file to a level
    pub fn add_file(&mut self, level: usize, file: FileMetaData) {
        if level < NUM_LEVELS {
            self.files[level].push(file);
            if level > 0 {
                let icmp = self.icmp.clone();
                self.files[level].sort_by(|a, b| icmp.compare(&a.smallest, &b.smallest));
            }
        }
    }

    /// Remove file from a level
    pub fn remove_file(&mut self, level: usize, file_number: u64) {
        if level < NUM_LEVELS {
            self.files[level].retain(|f| f.number != file_number);
        }
    }

    /// Build an iterator over a sorted, non-overlapping level
    pub fn new_level_iterator(
        &self,
        level: usize,
        opts: ReadOptions,
        opener: Arc<dyn TableOpener>,
    ) -> Result<LevelIterator> {
        if level == 0 || level >= NUM_LEVELS {
            return Err(Status::invalid_argument(format!(
                "Level {level} cannot be read with a level iterator"
            )));
        }

        Ok(LevelIterator::new(
            opts,
            self.icmp.user_comparator().clone(),
            opener,
            self.files[level].clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        key::{InternalKey, ValueType},
        util::BytewiseComparator,
    };

    fn file(number: u64, smallest: &str, largest: &str) -> FileMetaData {
        FileMetaData::new(
            number,
            1024,
            InternalKey::new(smallest, 1, ValueType::Value),
            InternalKey::new(largest, 1, ValueType::Value),
        )
    }

    fn version() -> Version {
        Version::new(Arc::new(BytewiseComparator))
    }

    #[test]
    fn test_version_new() {
        let version = version();
        assert_eq!(version.num_files(), 0);
        assert_eq!(version.num_level_files(NUM_LEVELS), 0);
        assert_eq!(version.comparator().name(), "leveliter.BytewiseComparator");
    }

    #[test]
    fn test_version_add_remove_file() {
        let mut version = version();
        version.add_file(1, file(2, "m", "p"));
        version.add_file(1, file(1, "a", "c"));
        assert_eq!(version.num_files(), 2);

        let numbers: Vec<u64> = version.level_files(1).iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 2]);

        version.remove_file(1, 1);
        assert_eq!(version.num_level_files(1), 1);
    }

    #[test]
    fn test_new_level_iterator_rejects_level0() {
        let version = version();
        let opener: Arc<dyn TableOpener> = Arc::new(crate::cache::TableCache::new());
        assert!(
            version
                .new_level_iterator(0, ReadOptions::default(), opener.clone())
                .err()
                .unwrap()
                .is_invalid_argument()
        );
        assert!(
            version
                .new_level_iterator(NUM_LEVELS, ReadOptions::default(), opener.clone())
                .is_err()
        );
        assert!(
            version
                .new_level_iterator(1, ReadOptions::default(), opener)
                .is_ok()
        );
    }
}
