use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::cache::SessionCache;
use crate::errors::AuthError;
use crate::models::Identity;

/// Cache key the signed-in identity is stored under.
pub const SESSION_CACHE_KEY: &str = "google_user";

/// The single session slot and its best-effort cache mirror.
///
/// The in-memory slot is authoritative. Cache failures are logged and never
/// undo a change to the slot. Writes to the slot and the cache happen under
/// one lock so the two cannot be interleaved by concurrent callers.
pub struct SessionStore {
    slot: watch::Sender<Option<Identity>>,
    cache: Arc<dyn SessionCache>,
    writer: Mutex<()>,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        let (slot, _rx) = watch::channel(None);
        SessionStore {
            slot,
            cache,
            writer: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.slot.borrow().clone()
    }

    /// Receiver that observes every change of the session slot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.slot.subscribe()
    }

    /// Replaces the current identity and mirrors it to the cache.
    pub fn set(&self, identity: Identity) {
        let _guard = self.writer.lock();
        match serde_json::to_string(&identity) {
            Ok(serialized) => {
                if let Err(e) = self.cache.set_item(SESSION_CACHE_KEY, &serialized) {
                    error!("Failed to persist session to cache: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize session: {}", e),
        }
        self.slot.send_replace(Some(identity));
    }

    /// Empties the slot and removes the cache entry.
    pub fn clear(&self) {
        let _guard = self.writer.lock();
        self.slot.send_replace(None);
        if let Err(e) = self.cache.remove_item(SESSION_CACHE_KEY) {
            error!("Failed to remove session from cache: {}", e);
        }
    }

    /// Adopts the cached identity, if there is a readable one.
    ///
    /// A corrupt entry is removed and reported as `CacheCorrupt`; the slot is
    /// left untouched in that case.
    pub fn restore(&self) -> Result<Option<Identity>, AuthError> {
        let _guard = self.writer.lock();
        let raw = match self.cache.get_item(SESSION_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No cached session found");
                return Ok(None);
            }
            Err(e) => {
                warn!("Could not read session cache: {}", e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => {
                self.slot.send_replace(Some(identity.clone()));
                Ok(Some(identity))
            }
            Err(e) => {
                if let Err(remove_err) = self.cache.remove_item(SESSION_CACHE_KEY) {
                    error!("Failed to remove corrupt session entry: {}", remove_err);
                }
                Err(AuthError::CacheCorrupt(e.to_string()))
            }
        }
    }
}
