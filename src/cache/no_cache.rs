use super::SessionCache;
use crate::errors::CacheError;

/// A cache that remembers nothing: reads find no entry, writes are dropped.
pub struct NoCache;

impl NoCache {
    pub fn new() -> Self {
        NoCache
    }
}

impl Default for NoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache for NoCache {
    fn get_item(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
