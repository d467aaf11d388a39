use std::sync::atomic::{AtomicU64, Ordering};

/// Read-path statistics
///
/// Thread-safe counters shared by level iterators and the table cache.
/// Uses atomic counters for lock-free updates.
#[derive(Debug, Default)]
pub struct Statistics {
    // Level iterator
    pub level_files_opened: AtomicU64,
    pub level_range_del_files_opened: AtomicU64,
    pub level_files_skipped: AtomicU64,
    pub level_boundary_pauses: AtomicU64,
    pub level_seeks: AtomicU64,
    pub level_iter_errors: AtomicU64,

    // Table cache
    pub table_cache_hits: AtomicU64,
    pub table_cache_misses: AtomicU64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    #[inline]
    pub fn record_file_opened(&self) {
        self.level_files_opened.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_range_del_file_opened(&self) {
        self.level_range_del_files_opened
            .fetch_add(1, Ordering::Relaxed);
    }

    /// A file was passed over because it lies outside the iterator bounds
    #[inline]
    pub fn record_file_skipped(&self) {
        self.level_files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_boundary_pause(&self) {
        self.level_boundary_pauses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_seek(&self) {
        self.level_seeks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error(&self) {
        self.level_iter_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_table_cache_hit(&self) {
        self.table_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_table_cache_miss(&self) {
        self.table_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            level_files_opened: self.level_files_opened.load(Ordering::Relaxed),
            level_range_del_files_opened: self
                .level_range_del_files_opened
                .load(Ordering::Relaxed),
            level_files_skipped: self.level_files_skipped.load(Ordering::Relaxed),
            level_boundary_pauses: self.level_boundary_pauses.load(Ordering::Relaxed),
            level_seeks: self.level_seeks.load(Ordering::Relaxed),
            level_iter_errors: self.level_iter_errors.load(Ordering::Relaxed),
            table_cache_hits: self.table_cache_hits.load(Ordering::Relaxed),
            table_cache_misses: self.table_cache_misses.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.level_files_opened,
            &self.level_range_del_files_opened,
            &self.level_files_skipped,
            &self.level_boundary_pauses,
            &self.level_seeks,
            &self.level_iter_errors,
            &self.table_cache_hits,
            &self.table_cache_misses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Plain copy of `Statistics`, convenient for asserting and reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub level_files_opened: u64,
    pub level_range_del_files_opened: u64,
    pub level_files_skipped: u64,
    pub level_boundary_pauses: u64,
    pub level_seeks: u64,
    pub level_iter_errors: u64,
    pub table_cache_hits: u64,
    pub table_cache_misses: u64,
}

impl StatisticsSnapshot {
    pub fn table_cache_hit_rate(&self) -> f64 {
        let total = self.table_cache_hits + self.table_cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.table_cache_hits as f64 / total as f64
    }
}

impl std::fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "** Level Iterator Stats **")?;
        writeln!(f, "Files opened: {}", self.level_files_opened)?;
        writeln!(
            f,
            "Range-del files opened: {}",
            self.level_range_del_files_opened
        )?;
        writeln!(f, "Files skipped by bounds: {}", self.level_files_skipped)?;
        writeln!(f, "Boundary pauses: {}", self.level_boundary_pauses)?;
        writeln!(f, "Seeks: {}", self.level_seeks)?;
        writeln!(f, "Errors: {}", self.level_iter_errors)?;
        writeln!(f)?;
        writeln!(f, "** Table Cache Stats **")?;
        writeln!(
            f,
            "Hits: {}, Misses: {}, Hit rate: {:.2}%",
            self.table_cache_hits,
            self.table_cache_misses,
            self.table_cache_hit_rate() * 100.0
        )
    }
}
