use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::credential::{decode_credential, CREDENTIAL_PARAM};
use super::location::{query_param, without_param, PageLocation};
use super::sdk::{
    ButtonOptions, CredentialCallback, CredentialResponse, IdConfiguration, IdentitySdk, MountHandle,
};
use crate::config::AuthConfig;
use crate::errors::AuthError;
use crate::models::Identity;
use crate::utils::log_throttle::LogThrottle;

const POLL_LOG_WINDOW: Duration = Duration::from_secs(5);

/// Receives every identity decoded from a provider credential.
pub type CredentialHandler = Arc<dyn Fn(Identity) + Send + Sync>;

/// Lifecycle of the bridge for one page load. There is no way back to
/// `Uninitialized`; a fresh bridge is needed for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    /// Waiting for the SDK to appear.
    Polling,
    /// The SDK has been initialized with our client id and callback.
    Configured,
    /// A credential arrived in the page URL and was dispatched; the SDK was not configured.
    Redirected,
    /// The bounded SDK wait elapsed or the SDK refused configuration.
    Unavailable,
}

/// Outcome of waiting for the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkWait {
    Ready,
    TimedOut,
}

/// What [`AuthBridge::initialize`] set in motion.
pub enum Initialization {
    /// A credential from the page URL was consumed synchronously.
    Redirected,
    /// The caller must drive (usually spawn) this future; it polls for the
    /// SDK and configures it once present. Dropping it cancels the wait.
    Polling(BoxFuture<'static, SdkWait>),
    /// Initialization already ran; only the handler was replaced.
    AlreadyStarted,
}

impl std::fmt::Debug for Initialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Initialization::Redirected => f.write_str("Redirected"),
            Initialization::Polling(_) => f.write_str("Polling(..)"),
            Initialization::AlreadyStarted => f.write_str("AlreadyStarted"),
        }
    }
}

struct Inner {
    sdk: Arc<dyn IdentitySdk>,
    location: Arc<dyn PageLocation>,
    client_id: String,
    poll_interval: Duration,
    sdk_load_timeout: Option<Duration>,
    button: ButtonOptions,
    state: Mutex<BridgeState>,
    handler: Mutex<Option<CredentialHandler>>,
    mounts: Mutex<HashSet<MountHandle>>,
    last_failure: Mutex<Option<AuthError>>,
    throttle: LogThrottle,
}

/// Isolates all interaction with the external identity SDK.
///
/// Every failure is caught here and logged; nothing is returned to callers
/// as an error. The most recent failure can be read with
/// [`AuthBridge::last_failure`].
#[derive(Clone)]
pub struct AuthBridge {
    inner: Arc<Inner>,
}

impl AuthBridge {
    pub fn new(
        sdk: Arc<dyn IdentitySdk>,
        location: Arc<dyn PageLocation>,
        config: &AuthConfig,
    ) -> Self {
        info!("Creating auth bridge for client '{}'", config.client_id);
        // tokio intervals cannot have a zero period
        let poll_interval = config.poll_interval().max(Duration::from_millis(1));
        AuthBridge {
            inner: Arc::new(Inner {
                sdk,
                location,
                client_id: config.client_id.clone(),
                poll_interval,
                sdk_load_timeout: config.sdk_load_timeout(),
                button: config.button.clone(),
                state: Mutex::new(BridgeState::Uninitialized),
                handler: Mutex::new(None),
                mounts: Mutex::new(HashSet::new()),
                last_failure: Mutex::new(None),
                throttle: LogThrottle::new(POLL_LOG_WINDOW),
            }),
        }
    }

    pub fn state(&self) -> BridgeState {
        *self.inner.state.lock()
    }

    pub fn last_failure(&self) -> Option<AuthError> {
        self.inner.last_failure.lock().clone()
    }

    /// Registers `on_credential` as the one live credential handler, replacing
    /// any earlier one, then either consumes a credential from the page URL
    /// or hands back the SDK polling future.
    pub fn initialize(&self, on_credential: CredentialHandler) -> Initialization {
        *self.inner.handler.lock() = Some(on_credential);

        let url = self.inner.location.url();
        if let Some(credential) = query_param(&url, CREDENTIAL_PARAM) {
            info!("Found credential in page URL, processing...");
            self.inner.dispatch_credential(&credential);
            self.inner
                .location
                .replace_url(without_param(&url, CREDENTIAL_PARAM));

            let mut state = self.inner.state.lock();
            if *state == BridgeState::Uninitialized {
                *state = BridgeState::Redirected;
            }
            return Initialization::Redirected;
        }

        {
            let mut state = self.inner.state.lock();
            if *state != BridgeState::Uninitialized {
                debug!("Auth bridge already initialized ({:?}); handler replaced", *state);
                return Initialization::AlreadyStarted;
            }
            *state = BridgeState::Polling;
        }

        let inner = self.inner.clone();
        Initialization::Polling(inner.configure_when_available().boxed())
    }

    /// Draws the provider's sign-in button into `mount` once the SDK is available.
    ///
    /// A mount holds at most one button: rendering into a mount that already
    /// has one is refused until [`AuthBridge::detach`] is called.
    pub async fn render_sign_in_affordance(&self, mount: &MountHandle) {
        if !self.inner.mounts.lock().insert(mount.clone()) {
            warn!("Sign-in button already attached to '{}'; detach it first", mount);
            return;
        }

        debug!("Rendering sign-in button into '{}'", mount);
        if self.inner.wait_for_sdk("bridge.sdk.render.poll").await == SdkWait::TimedOut {
            warn!("Identity SDK never became available; no button rendered in '{}'", mount);
            self.inner.mounts.lock().remove(mount);
            return;
        }

        match self.inner.sdk.render_button(mount, &self.inner.button) {
            Ok(()) => info!("Sign-in button rendered into '{}'", mount),
            Err(e) => {
                error!("Error rendering sign-in button into '{}': {}", mount, e);
                self.inner.mounts.lock().remove(mount);
            }
        }
    }

    /// Forgets the button attached to `mount`. Returns whether one was attached.
    pub fn detach(&self, mount: &MountHandle) -> bool {
        self.inner.mounts.lock().remove(mount)
    }

    pub fn is_attached(&self, mount: &MountHandle) -> bool {
        self.inner.mounts.lock().contains(mount)
    }

    /// Asks the SDK to show its sign-in prompt. The outcome, if any, arrives
    /// later through the credential handler.
    pub fn trigger_interactive_sign_in(&self) {
        if !self.inner.sdk.is_available() {
            warn!(
                event_name = "bridge.sign_in.unavailable",
                event_domain = "auth",
                "Identity SDK not available for interactive sign-in"
            );
            *self.inner.last_failure.lock() = Some(AuthError::ProviderUnavailable);
            return;
        }

        debug!("Interactive sign-in triggered");
        if let Err(e) = self.inner.sdk.prompt() {
            error!("Error triggering sign-in prompt: {}", e);
        }
    }

    /// Turns off the provider's automatic account selection for later visits.
    /// The remote session itself is not revoked.
    pub fn sign_out(&self) {
        if !self.inner.sdk.is_available() {
            debug!("Identity SDK not available; nothing to disable on sign out");
            return;
        }

        match self.inner.sdk.disable_auto_select() {
            Ok(()) => info!("Provider auto-select disabled"),
            Err(e) => error!("Error during provider sign out: {}", e),
        }
    }
}

impl Inner {
    fn dispatch_credential(&self, raw: &str) {
        let identity = match decode_credential(raw) {
            Ok(identity) => identity,
            Err(e) => {
                error!(
                    event_name = "bridge.credential.rejected",
                    event_domain = "auth",
                    "Error parsing provider credential: {}",
                    e
                );
                *self.last_failure.lock() = Some(e);
                return;
            }
        };

        info!(
            event_name = "bridge.credential.dispatched",
            event_domain = "auth",
            subject = identity.id(),
            "Credential received for '{}'",
            identity.email()
        );
        *self.last_failure.lock() = None;

        // Clone out of the lock so the handler may re-enter the bridge.
        let handler = self.handler.lock().clone();
        match handler {
            Some(handler) => handler(identity),
            None => warn!("Credential decoded but no handler is registered"),
        }
    }

    async fn wait_for_sdk(&self, log_key: &str) -> SdkWait {
        let poll = async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if self.sdk.is_available() {
                    return;
                }
                if let Some(suppressed_count) = self.throttle.should_emit(log_key) {
                    debug!(suppressed_count, "Identity SDK not ready, retrying...");
                }
            }
        };

        match self.sdk_load_timeout {
            Some(limit) => match timeout(limit, poll).await {
                Ok(()) => SdkWait::Ready,
                Err(_) => SdkWait::TimedOut,
            },
            None => {
                poll.await;
                SdkWait::Ready
            }
        }
    }

    async fn configure_when_available(self: Arc<Self>) -> SdkWait {
        let outcome = self.wait_for_sdk("bridge.sdk.initialize.poll").await;
        if outcome == SdkWait::TimedOut {
            warn!(
                event_name = "bridge.sdk.unavailable",
                event_domain = "auth",
                "Identity SDK did not load in time"
            );
            self.mark_unavailable();
            return outcome;
        }

        // Weak, so the SDK holding our callback does not keep the bridge alive.
        let weak: Weak<Inner> = Arc::downgrade(&self);
        let callback: CredentialCallback = Arc::new(move |response: CredentialResponse| {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch_credential(&response.credential);
            }
        });

        match self
            .sdk
            .initialize(IdConfiguration::popup(self.client_id.clone(), callback))
        {
            Ok(()) => {
                *self.state.lock() = BridgeState::Configured;
                info!(
                    event_name = "bridge.sdk.configured",
                    event_domain = "auth",
                    "Identity SDK initialized"
                );
            }
            Err(e) => {
                error!("Identity SDK rejected initialization: {}", e);
                self.mark_unavailable();
            }
        }
        outcome
    }

    fn mark_unavailable(&self) {
        *self.state.lock() = BridgeState::Unavailable;
        *self.last_failure.lock() = Some(AuthError::ProviderUnavailable);
    }
}
