#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use knowleadge::bridge::{
    AuthBridge, ButtonOptions, CredentialResponse, IdConfiguration, IdentitySdk, MemoryLocation,
    MountHandle,
};
use knowleadge::cache::{MemoryCache, SessionCache};
use knowleadge::config::{AuthConfig, ConfigV1};
use knowleadge::session::{SessionController, SessionStore};
use knowleadge::startup::build_state;
use knowleadge::state::AppState;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const PAGE_URL: &str = "https://knowleadge.io/";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub aud: String,
    pub exp: i64,
}

/// Mints a signed credential the way the provider would hand it over.
/// The signing key is irrelevant: signatures are never checked.
pub fn mint_credential(sub: &str, name: &str, email: &str, picture: Option<&str>) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        picture: picture.map(str::to_string),
        aud: "knowleadge".to_string(),
        exp: 4_102_444_800,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-test-secret"),
    )
    .expect("failed to encode test credential")
}

pub fn location(url: &str) -> Arc<MemoryLocation> {
    Arc::new(MemoryLocation::parse(url).expect("invalid test URL"))
}

/// Scriptable stand-in for the provider's client library.
#[derive(Default)]
pub struct FakeSdk {
    available: AtomicBool,
    config: Mutex<Option<IdConfiguration>>,
    pub initializations: AtomicUsize,
    pub rendered: Mutex<Vec<MountHandle>>,
    pub prompts: AtomicUsize,
    pub auto_select_disabled: AtomicBool,
}

impl FakeSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn loaded() -> Arc<Self> {
        let sdk = Self::new();
        sdk.set_available(true);
        sdk
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn client_id(&self) -> Option<String> {
        self.config.lock().as_ref().map(|c| c.client_id.clone())
    }

    /// Delivers `credential` through the callback registered at initialization.
    pub fn deliver(&self, credential: &str) {
        let callback = self
            .config
            .lock()
            .as_ref()
            .map(|c| c.callback.clone())
            .expect("SDK was never initialized");
        callback(CredentialResponse {
            credential: credential.to_string(),
        });
    }
}

impl IdentitySdk for FakeSdk {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn initialize(&self, config: IdConfiguration) -> Result<(), String> {
        self.initializations.fetch_add(1, Ordering::SeqCst);
        *self.config.lock() = Some(config);
        Ok(())
    }

    fn render_button(&self, mount: &MountHandle, _options: &ButtonOptions) -> Result<(), String> {
        self.rendered.lock().push(mount.clone());
        Ok(())
    }

    fn prompt(&self) -> Result<(), String> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn disable_auto_select(&self) -> Result<(), String> {
        self.auto_select_disabled.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Wires a session controller the way startup does, over a caller-owned cache.
pub fn controller(
    cache: Arc<dyn SessionCache>,
    sdk: Arc<FakeSdk>,
    location: Arc<MemoryLocation>,
    config: &AuthConfig,
) -> SessionController {
    let bridge = AuthBridge::new(sdk, location, config);
    SessionController::new(
        Arc::new(SessionStore::new(cache)),
        bridge,
        config.ready_timeout(),
    )
}

pub fn build_app(config: ConfigV1, sdk: Arc<FakeSdk>, location: Arc<MemoryLocation>) -> AppState {
    build_state(Arc::new(config), sdk, location).expect("failed to build app state")
}

pub fn seeded_cache(key: &str, value: &str) -> Arc<MemoryCache> {
    Arc::new(MemoryCache::with_entries([(key, value)]))
}
