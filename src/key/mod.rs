pub mod internal_key;

pub use internal_key::{InternalKey, InternalKeyComparator, MAX_SEQUENCE_NUMBER, ValueType};
