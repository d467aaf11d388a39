pub mod file_metadata;
#[allow(clippy::module_inception)]
pub mod version;

pub use file_metadata::FileMetaData;
pub use version::{NUM_LEVELS, Version};
