pub mod table_cache;

pub use table_cache::TableCache;
