//! Shared application state.
//!
//! Everything the presentation layer needs for one page load: configuration,
//! the session controller and the lead submission service.

use crate::config::ConfigV1;
use crate::leads::LeadSubmitter;
use crate::session::SessionController;
use std::sync::Arc;

/// Application state handed to the presentation layer.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Session owner; exposes the session, readiness, sign in and sign out.
    pub session: Arc<SessionController>,
    /// Delivers submitted leads to the research webhook.
    pub leads: Arc<dyn LeadSubmitter>,
}
