pub mod comparator;
pub mod slice;
pub mod status;

pub use comparator::{BytewiseComparator, Comparator, ReverseBytewiseComparator};
pub use slice::Slice;
pub use status::{Code, Result, Status};
