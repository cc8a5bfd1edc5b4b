use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::SessionCache;
use crate::errors::CacheError;

/// A cache persisted as a single JSON object (`{"key": "value", ...}`) on disk.
///
/// All entries are loaded on open and the whole file is rewritten on each
/// change, via a sibling temp file renamed into place.
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileCache {
    /// Opens the cache at `path`. A missing file is an empty cache, and so is
    /// one that no longer parses: its contents are discarded and the file is
    /// rewritten empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let (entries, corrupt): (HashMap<String, String>, bool) = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => (HashMap::new(), false),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => (entries, false),
                Err(e) => {
                    warn!(
                        event_name = "session.cache.corrupt",
                        event_domain = "auth",
                        "Discarding unreadable cache file '{}': {}",
                        path.display(),
                        e
                    );
                    (HashMap::new(), true)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (HashMap::new(), false),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened file cache '{}' with {} entries", path.display(), entries.len());

        let cache = FileCache {
            path,
            entries: Mutex::new(entries),
        };
        if corrupt {
            cache.persist(&HashMap::new())?;
        }
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionCache for FileCache {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let cache = FileCache::open(&path).unwrap();
        cache.set_item("google_user", r#"{"id":"1"}"#).unwrap();
        drop(cache);

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("google_user").unwrap().as_deref(),
            Some(r#"{"id":"1"}"#)
        );
    }

    #[test]
    fn test_remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let cache = FileCache::open(&path).unwrap();
        cache.set_item("google_user", "x").unwrap();
        cache.remove_item("google_user").unwrap();

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get_item("google_user").unwrap(), None);
    }

    #[test]
    fn test_unparseable_file_starts_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"google_user": "{\"id\":"#).unwrap();

        let cache = FileCache::open(&path).unwrap();
        assert_eq!(cache.get_item("google_user").unwrap(), None);

        let contents = fs::read_to_string(&path).unwrap();
        let on_disk: HashMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert!(on_disk.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = FileCache::open(&path).unwrap();
        cache.set_item("google_user", "first").unwrap();

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(cache.set_item("google_user", "second").is_err());
        assert!(cache.remove_item("google_user").is_err());
        assert_eq!(
            cache.get_item("google_user").unwrap().as_deref(),
            Some("first")
        );
    }
}
