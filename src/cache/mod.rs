pub mod base;
pub mod file_cache;
pub mod memory_cache;
pub mod no_cache;

// Re-export the primary cache items so code outside can do
// "use crate::cache::{SessionCache, create_cache};"
pub use base::{create_cache, SessionCache};
pub use file_cache::FileCache;
pub use memory_cache::MemoryCache;
pub use no_cache::NoCache;
