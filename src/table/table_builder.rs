use std::{cmp::Ordering, sync::Arc};

use crate::{
    key::{InternalKey, InternalKeyComparator, MAX_SEQUENCE_NUMBER, ValueType},
    table::table::{Entry, Table},
    util::{Comparator, Result, Slice, Status},
    version::FileMetaData,
};

/// Builder for in-memory tables
///
/// Produces the table together with the `FileMetaData` a level catalog needs.
/// When a range tombstone reaches past the point keys, the file boundary is
/// the tombstone itself (`start#seq,RANGEDEL` or `end#MAX,RANGEDEL`).
pub struct TableBuilder {
    number: u64,
    comparator: Arc<dyn Comparator>,
    icmp: InternalKeyComparator,
    entries: Vec<Entry>,
    range_dels: Vec<Entry>,
    file_size: u64,
}

impl TableBuilder {
    pub fn new(number: u64, comparator: Arc<dyn Comparator>) -> Self {
        TableBuilder {
            number,
            icmp: InternalKeyComparator::new(comparator.clone()),
            comparator,
            entries: Vec::new(),
            range_dels: Vec::new(),
            file_size: 0,
        }
    }

    /// Add a point entry
    /// Keys must be added in strictly increasing internal-key order
    pub fn add(&mut self, key: InternalKey, value: impl Into<Slice>) -> Result<()> {
        if key.is_range_deletion() || !key.is_valid() {
            return Err(Status::invalid_argument(format!(
                "Point entry cannot have kind of {key}"
            )));
        }
        if let Some((last, _)) = self.entries.last() {
            if self.icmp.compare(&key, last) != Ordering::Greater {
                return Err(Status::invalid_argument(format!(
                    "Keys must be added in sorted order: {key} after {last}"
                )));
            }
        }

        let value = value.into();
        self.file_size += (key.encode().size() + value.size()) as u64;
        self.entries.push((key, value));
        Ok(())
    }

    /// Add a range tombstone deleting `[start, end)` as of `sequence`
    pub fn add_range_deletion(
        &mut self,
        start: impl Into<Slice>,
        end: impl Into<Slice>,
        sequence: u64,
    ) -> Result<()> {
        if sequence > MAX_SEQUENCE_NUMBER {
            return Err(Status::invalid_argument(format!(
                "Sequence number {sequence} exceeds {MAX_SEQUENCE_NUMBER}"
            )));
        }
        let start = start.into();
        let end = end.into();
        if self.comparator.compare(start.data(), end.data()) != Ordering::Less {
            return Err(Status::invalid_argument(format!(
                "Empty range tombstone [{start}, {end})"
            )));
        }

        let key = InternalKey::new(start, sequence, ValueType::RangeDeletion);
        self.file_size += (key.encode().size() + end.size()) as u64;
        self.range_dels.push((key, end));
        Ok(())
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len() + self.range_dels.len()
    }

    /// Finish building; fails when nothing was added
    pub fn finish(mut self) -> Result<(Table, FileMetaData)> {
        let icmp = self.icmp.clone();
        self.range_dels.sort_by(|a, b| icmp.compare(&a.0, &b.0));

        let mut smallest: Option<InternalKey> = self.entries.first().map(|(k, _)| k.clone());
        let mut largest: Option<InternalKey> = self.entries.last().map(|(k, _)| k.clone());

        for (start, end) in &self.range_dels {
            let end_key = InternalKey::new(end.clone(), MAX_SEQUENCE_NUMBER, ValueType::RangeDeletion);
            smallest = Some(match smallest {
                Some(s) if icmp.compare(&s, start) != Ordering::Greater => s,
                _ => start.clone(),
            });
            largest = Some(match largest {
                Some(l) if icmp.compare(&l, &end_key) != Ordering::Less => l,
                _ => end_key,
            });
        }

        let (Some(smallest), Some(largest)) = (smallest, largest) else {
            return Err(Status::invalid_argument(format!(
                "Table {} has no entries",
                self.number
            )));
        };

        let meta = FileMetaData::new(self.number, self.file_size, smallest, largest);
        let table = Table::new(self.number, self.comparator, self.entries, self.range_dels);
        Ok((table, meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::BytewiseComparator;

    fn builder(number: u64) -> TableBuilder {
        TableBuilder::new(number, Arc::new(BytewiseComparator))
    }

    #[test]
    fn test_point_boundaries() {
        let mut b = builder(1);
        b.add(InternalKey::new("a", 3, ValueType::Value), "1").unwrap();
        b.add(InternalKey::new("c", 2, ValueType::Deletion), "").unwrap();

        let (table, meta) = b.finish().unwrap();
        assert_eq!(table.num_entries(), 2);
        assert_eq!(meta.number, 1);
        assert_eq!(meta.smallest, InternalKey::new("a", 3, ValueType::Value));
        assert_eq!(meta.largest, InternalKey::new("c", 2, ValueType::Deletion));
        assert!(meta.file_size > 0);
    }

    #[test]
    fn test_tombstone_extends_boundaries() {
        let mut b = builder(2);
        b.add(InternalKey::new("c", 5, ValueType::Value), "v").unwrap();
        b.add_range_deletion("d", "g", 4).unwrap();
        b.add_range_deletion("b", "c", 3).unwrap();

        let (table, meta) = b.finish().unwrap();
        assert_eq!(table.num_range_deletions(), 2);
        assert_eq!(meta.smallest, InternalKey::new("b", 3, ValueType::RangeDeletion));
        assert_eq!(
            meta.largest,
            InternalKey::new("g", MAX_SEQUENCE_NUMBER, ValueType::RangeDeletion)
        );
    }

    #[test]
    fn test_tombstone_inside_points_keeps_point_boundaries() {
        let mut b = builder(3);
        b.add(InternalKey::new("a", 5, ValueType::Value), "v").unwrap();
        b.add(InternalKey::new("z", 5, ValueType::Value), "v").unwrap();
        b.add_range_deletion("c", "z", 4).unwrap();

        let (_, meta) = b.finish().unwrap();
        assert!(!meta.smallest.is_range_deletion());
        assert!(!meta.largest.is_range_deletion());
    }

    #[test]
    fn test_rejects_misuse() {
        let mut b = builder(4);
        b.add(InternalKey::new("b", 1, ValueType::Value), "v").unwrap();
        assert!(
            b.add(InternalKey::new("a", 1, ValueType::Value), "v")
                .unwrap_err()
                .is_invalid_argument()
        );
        assert!(b.add_range_deletion("x", "x", 1).unwrap_err().is_invalid_argument());
        assert!(
            b.add(InternalKey::new("c", 1, ValueType::RangeDeletion), "d")
                .unwrap_err()
                .is_invalid_argument()
        );

        assert!(builder(5).finish().is_err());
    }

    #[test]
    fn test_sequence_bounds() {
        let mut b = builder(6);
        b.add(InternalKey::new("a", MAX_SEQUENCE_NUMBER + 1, ValueType::Value), "new")
            .unwrap();
        b.add(InternalKey::new("a", 5, ValueType::Value), "old").unwrap();
        assert!(
            b.add_range_deletion("b", "c", MAX_SEQUENCE_NUMBER + 1)
                .unwrap_err()
                .is_invalid_argument()
        );
        b.add_range_deletion("b", "c", MAX_SEQUENCE_NUMBER).unwrap();

        let (table, meta) = b.finish().unwrap();
        assert_eq!(table.num_entries(), 2);
        assert_eq!(meta.smallest.sequence(), MAX_SEQUENCE_NUMBER);
    }
}
