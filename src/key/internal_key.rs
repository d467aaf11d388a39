use std::{cmp::Ordering, fmt, sync::Arc};

use crate::util::{Comparator, Result, Slice, Status};

/// Largest sequence number an internal key can carry (56 bits).
pub const MAX_SEQUENCE_NUMBER: u64 = (1 << 56) - 1;

/// Kind of entry an internal key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ValueType {
    Deletion = 0,
    Value = 1,
    Merge = 2,
    SingleDeletion = 7,
    RangeDeletion = 15,
    /// Never written; marks `InternalKey::invalid()`.
    Invalid = 255,
}

impl ValueType {
    pub fn from_u8(v: u8) -> Option<ValueType> {
        match v {
            0 => Some(ValueType::Deletion),
            1 => Some(ValueType::Value),
            2 => Some(ValueType::Merge),
            7 => Some(ValueType::SingleDeletion),
            15 => Some(ValueType::RangeDeletion),
            255 => Some(ValueType::Invalid),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ValueType::Deletion => "DEL",
            ValueType::Value => "SET",
            ValueType::Merge => "MERGE",
            ValueType::SingleDeletion => "SINGLEDEL",
            ValueType::RangeDeletion => "RANGEDEL",
            ValueType::Invalid => "INVALID",
        }
    }
}

/// A user key tagged with a sequence number and entry kind
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InternalKey {
    user_key: Slice,
    sequence: u64,
    value_type: ValueType,
}

impl InternalKey {
    /// `sequence` is capped at `MAX_SEQUENCE_NUMBER`; the trailer has only
    /// 56 bits for it.
    pub fn new(user_key: impl Into<Slice>, sequence: u64, value_type: ValueType) -> Self {
        InternalKey {
            user_key: user_key.into(),
            sequence: sequence.min(MAX_SEQUENCE_NUMBER),
            value_type,
        }
    }

    /// Sentinel returned by iterators that are not positioned on an entry
    pub fn invalid() -> Self {
        InternalKey {
            user_key: Slice::empty(),
            sequence: 0,
            value_type: ValueType::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value_type != ValueType::Invalid
    }

    pub fn user_key(&self) -> &Slice {
        &self.user_key
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_range_deletion(&self) -> bool {
        self.value_type == ValueType::RangeDeletion
    }

    /// Packed sequence and type, as stored in the 8-byte trailer
    pub fn trailer(&self) -> u64 {
        (self.sequence << 8) | self.value_type as u64
    }

    /// `user_key ‖ fixed64_le(sequence << 8 | type)`
    pub fn encode(&self) -> Slice {
        let mut buf = Vec::with_capacity(self.user_key.size() + 8);
        buf.extend_from_slice(self.user_key.data());
        buf.extend_from_slice(&self.trailer().to_le_bytes());
        Slice::from(buf)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(Status::corruption("InternalKey too short"));
        }

        let split = data.len() - 8;
        let trailer_bytes: [u8; 8] = data[split..]
            .try_into()
            .map_err(|_| Status::corruption("Invalid internal key trailer"))?;
        let trailer = u64::from_le_bytes(trailer_bytes);

        let value_type = ValueType::from_u8((trailer & 0xff) as u8)
            .ok_or_else(|| Status::corruption(format!("Unknown value type {}", trailer & 0xff)))?;

        Ok(InternalKey {
            user_key: Slice::from(&data[..split]),
            sequence: trailer >> 8,
            value_type,
        })
    }
}

impl fmt::Debug for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{},{}",
            self.user_key,
            self.sequence,
            self.value_type.label()
        )
    }
}

/// Orders internal keys: user key ascending under the wrapped comparator,
/// then sequence descending, then type descending.
#[derive(Clone)]
pub struct InternalKeyComparator {
    user_comparator: Arc<dyn Comparator>,
}

impl InternalKeyComparator {
    pub fn new(user_comparator: Arc<dyn Comparator>) -> Self {
        InternalKeyComparator { user_comparator }
    }

    pub fn user_comparator(&self) -> &Arc<dyn Comparator> {
        &self.user_comparator
    }

    pub fn compare(&self, a: &InternalKey, b: &InternalKey) -> Ordering {
        self.user_comparator
            .compare(a.user_key.data(), b.user_key.data())
            .then_with(|| b.trailer().cmp(&a.trailer()))
    }
}
