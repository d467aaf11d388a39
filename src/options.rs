use crate::util::Slice;

/// Options that control a read session over one or more levels.
///
/// The bounds are user keys. `iterate_lower_bound` is inclusive,
/// `iterate_upper_bound` is exclusive. Seek keys are expected to be clamped
/// to these bounds by the caller; the iterators in this crate only use the
/// bounds to avoid opening tables and to stop early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub iterate_lower_bound: Option<Slice>,
    pub iterate_upper_bound: Option<Slice>,
}

impl ReadOptions {
    pub fn new() -> Self {
        ReadOptions::default()
    }

    pub fn with_lower_bound(mut self, bound: impl Into<Slice>) -> Self {
        self.iterate_lower_bound = Some(bound.into());
        self
    }

    pub fn with_upper_bound(mut self, bound: impl Into<Slice>) -> Self {
        self.iterate_upper_bound = Some(bound.into());
        self
    }

    #[inline]
    pub fn lower_bound(&self) -> Option<&[u8]> {
        self.iterate_lower_bound.as_ref().map(Slice::data)
    }

    #[inline]
    pub fn upper_bound(&self) -> Option<&[u8]> {
        self.iterate_upper_bound.as_ref().map(Slice::data)
    }
}
