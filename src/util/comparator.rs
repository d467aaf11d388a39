use std::cmp::Ordering;

/// Total order over user keys.
///
/// Injected into every component that searches or compares keys; nothing in
/// the crate falls back to a global default.
pub trait Comparator: Send + Sync {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// Name persisted alongside data ordered by this comparator
    fn name(&self) -> &str;
}

/// Lexicographic byte order
#[derive(Debug, Default, Clone, Copy)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &str {
        "leveliter.BytewiseComparator"
    }
}

/// Reverse lexicographic byte order
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseBytewiseComparator;

impl Comparator for ReverseBytewiseComparator {
    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        b.cmp(a)
    }

    fn name(&self) -> &str {
        "leveliter.ReverseBytewiseComparator"
    }
}
