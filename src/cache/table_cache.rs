use std::{collections::HashMap, sync::Arc};

use parking_lot::{Mutex, RwLock};

use crate::{
    iterator::InternalIterator,
    options::ReadOptions,
    statistics::Statistics,
    table::{Table, TableOpener},
    util::{Result, Status},
    version::FileMetaData,
};

/// TableCache keeps the tables of a version addressable by file number and
/// hands out iterators over them.
///
/// It is the `TableOpener` a level iterator is normally built with. Every
/// open is counted per file, which makes it easy to observe how lazily a
/// level iterator touches its files.
pub struct TableCache {
    tables: RwLock<HashMap<u64, Arc<Table>>>,
    opens: Mutex<HashMap<u64, OpenCounts>>,
    statistics: Option<Arc<Statistics>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct OpenCounts {
    point: u64,
    range_del: u64,
}

impl TableCache {
    pub fn new() -> Self {
        TableCache {
            tables: RwLock::new(HashMap::new()),
            opens: Mutex::new(HashMap::new()),
            statistics: None,
        }
    }

    pub fn with_statistics(statistics: Arc<Statistics>) -> Self {
        TableCache {
            statistics: Some(statistics),
            ..TableCache::new()
        }
    }

    /// Register a table, replacing any table with the same number
    pub fn insert(&self, table: Table) {
        self.tables.write().insert(table.number(), Arc::new(table));
    }

    /// Drop a table, e.g. after it was compacted away
    pub fn remove(&self, number: u64) -> Option<Arc<Table>> {
        self.tables.write().remove(&number)
    }

    pub fn contains(&self, number: u64) -> bool {
        self.tables.read().contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Number of point iterators opened for `number`
    pub fn open_count(&self, number: u64) -> u64 {
        self.opens.lock().get(&number).map_or(0, |c| c.point)
    }

    /// Number of range tombstone iterators opened for `number`
    pub fn range_del_open_count(&self, number: u64) -> u64 {
        self.opens.lock().get(&number).map_or(0, |c| c.range_del)
    }

    /// Total number of point iterators opened across all files
    pub fn total_open_count(&self) -> u64 {
        self.opens.lock().values().map(|c| c.point).sum()
    }

    fn find_table(&self, number: u64) -> Result<Arc<Table>> {
        let table = self.tables.read().get(&number).cloned();
        match table {
            Some(table) => {
                if let Some(stats) = &self.statistics {
                    stats.record_table_cache_hit();
                }
                Ok(table)
            },
            None => {
                if let Some(stats) = &self.statistics {
                    stats.record_table_cache_miss();
                }
                Err(Status::not_found(format!("table {number:06}.sst")))
            },
        }
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TableOpener for TableCache {
    fn open_table(
        &self,
        file: &FileMetaData,
        opts: &ReadOptions,
    ) -> Result<Box<dyn InternalIterator>> {
        let table = self.find_table(file.number)?;
        self.opens.lock().entry(file.number).or_default().point += 1;
        Ok(Box::new(table.iter(opts)))
    }

    fn open_range_del_table(&self, file: &FileMetaData) -> Result<Box<dyn InternalIterator>> {
        let table = self.find_table(file.number)?;
        self.opens.lock().entry(file.number).or_default().range_del += 1;
        Ok(Box::new(table.range_del_iter()))
    }
}
