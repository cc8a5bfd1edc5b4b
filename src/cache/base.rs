use std::sync::Arc;

use tracing::{info, warn};

use super::{file_cache::FileCache, memory_cache::MemoryCache, no_cache::NoCache};
use crate::config::{CacheBackend, CacheConfig};
use crate::errors::CacheError;

/// The SessionCache trait abstracts a durable string key/value store,
/// the way a browser's local storage is used to remember a signed-in user.
pub trait SessionCache: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
    /// Whether written entries can be read back later. `NoCache` says no.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Creates a concrete cache implementation based on the CacheConfig.
/// If `cache.enabled = false`, returns NoCache. Otherwise, picks the specified backend.
pub fn create_cache(config: &CacheConfig) -> Result<Arc<dyn SessionCache>, CacheError> {
    if !config.enabled {
        info!("Session cache is disabled. Using NoCache.");
        return Ok(Arc::new(NoCache::new()));
    }

    match &config.backend {
        Some(CacheBackend::File(file_config)) => {
            let cache = FileCache::open(&file_config.path)?;
            info!("Using file session cache at '{}'.", cache.path().display());
            Ok(Arc::new(cache))
        }
        Some(CacheBackend::Memory) => {
            info!("Using in-memory session cache.");
            Ok(Arc::new(MemoryCache::new()))
        }
        None => {
            warn!("Session cache is enabled but no backend is configured; using in-memory cache.");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}
