//! Application startup.
//!
//! Builds the session cache, the auth bridge, the session controller and the
//! lead submitter from configuration, and bootstraps the session.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bridge::{AuthBridge, IdentitySdk, PageLocation};
use crate::cache::create_cache;
use crate::config::ConfigV1;
use crate::leads::{LeadSubmitter, WebhookSubmitter};
use crate::session::{SessionController, SessionStore};
use crate::state::AppState;

/// Wires up the application for one page load.
///
/// `sdk` is the identity provider's client library and `location` the page
/// address it was loaded from.
///
/// # Errors
///
/// Returns an error if the session cache cannot be opened or the HTTP client
/// for lead submission cannot be built.
pub fn build_state(
    config: Arc<ConfigV1>,
    sdk: Arc<dyn IdentitySdk>,
    location: Arc<dyn PageLocation>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let cache = create_cache(&config.cache)?;
    if !cache.is_enabled() {
        warn!("Session cache disabled; sign-ins will not survive a reload");
    }
    let store = Arc::new(SessionStore::new(cache));
    let bridge = AuthBridge::new(sdk, location, &config.auth);
    let session = Arc::new(SessionController::new(
        store,
        bridge,
        config.auth.ready_timeout(),
    ));
    let leads: Arc<dyn LeadSubmitter> = Arc::new(WebhookSubmitter::new(&config.leads)?);

    Ok(AppState {
        config,
        session,
        leads,
    })
}

/// Builds the application state, bootstraps the session and waits until it
/// is ready to be shown.
///
/// Must be called from within a Tokio runtime.
pub async fn run(
    config: Arc<ConfigV1>,
    sdk: Arc<dyn IdentitySdk>,
    location: Arc<dyn PageLocation>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let state = build_state(config, sdk, location)?;
    state.session.bootstrap();
    state.session.wait_ready().await;

    match state.session.session() {
        Some(identity) => info!("Session ready for '{}'", identity.email()),
        None => info!("Session ready; signed out"),
    }
    Ok(state)
}
