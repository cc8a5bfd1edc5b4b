use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::readiness::Readiness;
use super::store::SessionStore;
use crate::bridge::{AuthBridge, CredentialHandler, Initialization};
use crate::errors::AuthError;
use crate::models::Identity;

/// What the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session: Option<Identity>,
    pub ready: bool,
    /// Last sign-in problem reported by the bridge, for an optional retry prompt.
    pub last_failure: Option<AuthError>,
}

/// Owns the session for one page load and wires the auth bridge into it.
///
/// The cached identity is restored optimistically; any identity delivered by
/// the provider afterwards overwrites it (last write wins). Background work
/// started by [`SessionController::bootstrap`] is aborted when the controller
/// is dropped.
pub struct SessionController {
    store: Arc<SessionStore>,
    bridge: AuthBridge,
    readiness: Arc<Readiness>,
    ready_timeout: Duration,
    bootstrapped: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionController {
    pub fn new(store: Arc<SessionStore>, bridge: AuthBridge, ready_timeout: Duration) -> Self {
        SessionController {
            store,
            bridge,
            readiness: Arc::new(Readiness::new()),
            ready_timeout,
            bootstrapped: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Restores the cached session, starts the bridge and arms the readiness
    /// timeout. Runs once; later calls are ignored.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bootstrap(&self) {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            warn!("Session bootstrap already ran; ignoring repeated call");
            return;
        }

        match self.store.restore() {
            Ok(Some(identity)) => info!("Restored session for '{}' from cache", identity.email()),
            Ok(None) => debug!("Starting without a session"),
            Err(e) => warn!(
                event_name = "session.cache.corrupt",
                event_domain = "auth",
                "Discarded cached session: {}",
                e
            ),
        }

        let store = self.store.clone();
        let readiness = self.readiness.clone();
        let on_credential: CredentialHandler = Arc::new(move |identity: Identity| {
            info!("Signing in '{}'", identity.email());
            store.set(identity);
            readiness.mark_ready();
        });

        let mut tasks = self.tasks.lock();
        match self.bridge.initialize(on_credential) {
            Initialization::Polling(wait) => tasks.push(tokio::spawn(async move {
                let outcome = wait.await;
                debug!("Identity SDK wait finished: {:?}", outcome);
            })),
            Initialization::Redirected => debug!("Session established from redirect credential"),
            Initialization::AlreadyStarted => {}
        }

        let readiness = self.readiness.clone();
        let ready_timeout = self.ready_timeout;
        tasks.push(tokio::spawn(async move {
            tokio::time::sleep(ready_timeout).await;
            if readiness.mark_ready() {
                info!(
                    event_name = "session.ready.timeout",
                    event_domain = "auth",
                    "Session marked ready after {:?} without a provider credential",
                    ready_timeout
                );
            }
        }));
    }

    /// Starts an interactive sign-in. Completion is observed through the session.
    pub fn sign_in(&self) {
        debug!("Sign in requested");
        self.bridge.trigger_interactive_sign_in();
    }

    /// Ends the session immediately: slot, cache and provider auto-select.
    pub fn sign_out(&self) {
        info!("Sign out requested");
        self.store.clear();
        self.bridge.sign_out();
    }

    pub fn session(&self) -> Option<Identity> {
        self.store.current()
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub async fn wait_ready(&self) {
        self.readiness.wait().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.store.subscribe()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session: self.session(),
            ready: self.is_ready(),
            last_failure: self.bridge.last_failure(),
        }
    }

    /// The bridge, for rendering the provider's sign-in button.
    pub fn bridge(&self) -> &AuthBridge {
        &self.bridge
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{MemoryLocation, NoSdk};
    use crate::cache::{MemoryCache, SessionCache};
    use crate::config::AuthConfig;
    use crate::session::SESSION_CACHE_KEY;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn controller(cache: Arc<MemoryCache>, url: &str) -> SessionController {
        let config = AuthConfig::default();
        let location = Arc::new(MemoryLocation::parse(url).unwrap());
        let bridge = AuthBridge::new(Arc::new(NoSdk::new()), location, &config);
        SessionController::new(
            Arc::new(SessionStore::new(cache)),
            bridge,
            config.ready_timeout(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_is_forced_after_timeout() {
        let controller = controller(Arc::new(MemoryCache::new()), "https://knowleadge.io/");
        controller.bootstrap();
        assert!(!controller.is_ready());

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!controller.is_ready());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(controller.is_ready());
        assert_eq!(controller.session(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_credential_signs_in_and_marks_ready() {
        let cache = Arc::new(MemoryCache::new());
        let token = format!(
            "e30.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"sub":"9","name":"Lin","email":"lin@x.com"}"#)
        );
        let controller = controller(
            cache.clone(),
            &format!("https://knowleadge.io/?credential={}", token),
        );

        controller.bootstrap();

        assert!(controller.is_ready());
        assert_eq!(controller.session().unwrap().name(), "Lin");
        assert!(cache.get_item(SESSION_CACHE_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_bootstrap_is_ignored() {
        let controller = controller(Arc::new(MemoryCache::new()), "https://knowleadge.io/");
        controller.bootstrap();
        controller.bootstrap();
        assert_eq!(controller.tasks.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_harmless() {
        let cache = Arc::new(MemoryCache::new());
        let controller = controller(cache.clone(), "https://knowleadge.io/");
        controller.sign_out();
        assert_eq!(controller.session(), None);
        assert_eq!(cache.get_item(SESSION_CACHE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_in_without_sdk_surfaces_failure_in_view() {
        let controller = controller(Arc::new(MemoryCache::new()), "https://knowleadge.io/");
        controller.sign_in();
        assert_eq!(
            controller.view().last_failure,
            Some(AuthError::ProviderUnavailable)
        );
    }
}
