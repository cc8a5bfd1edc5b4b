use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use super::webhook::LeadSubmitter;
use crate::errors::LeadError;
use crate::models::{Identity, LeadRequest, Platform, PlatformLink};

/// Shown to the user after a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Lead research initiated! You will receive results via email.";

/// The prospect form: chosen platforms and the URL typed for each.
#[derive(Debug, Default, Clone)]
pub struct LeadForm {
    selected: Vec<Platform>,
    urls: HashMap<Platform, String>,
}

impl LeadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `platform`, or deselects it and forgets its URL.
    pub fn toggle_platform(&mut self, platform: Platform) {
        if self.selected.contains(&platform) {
            self.remove_platform(platform);
        } else {
            self.selected.push(platform);
        }
    }

    pub fn remove_platform(&mut self, platform: Platform) {
        self.selected.retain(|p| *p != platform);
        self.urls.remove(&platform);
    }

    /// Records the URL for `platform`, selecting it if needed.
    pub fn update_url(&mut self, platform: Platform, url: impl Into<String>) {
        if !self.selected.contains(&platform) {
            self.selected.push(platform);
        }
        self.urls.insert(platform, url.into());
    }

    pub fn selected(&self) -> &[Platform] {
        &self.selected
    }

    pub fn url(&self, platform: Platform) -> Option<&str> {
        self.urls.get(&platform).map(String::as_str)
    }

    /// Non-blank URLs, trimmed, in the order their platforms were selected.
    pub fn filled_links(&self) -> Vec<PlatformLink> {
        self.selected
            .iter()
            .filter_map(|platform| {
                let url = self.urls.get(platform)?.trim();
                (!url.is_empty()).then(|| PlatformLink {
                    platform: *platform,
                    url: url.to_string(),
                })
            })
            .collect()
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self, session: Option<&Identity>) -> bool {
        session.is_some() && !self.filled_links().is_empty()
    }

    /// Sends the filled URLs for research on behalf of `session`.
    ///
    /// The form is cleared only on success; on any error what the user typed
    /// stays in place so they can try again.
    pub async fn submit(
        &mut self,
        session: Option<&Identity>,
        submitter: &dyn LeadSubmitter,
    ) -> Result<Value, LeadError> {
        let links = self.filled_links();
        if links.is_empty() {
            return Err(LeadError::NoUrls);
        }
        let identity = session.ok_or(LeadError::NotSignedIn)?;

        let request = LeadRequest::new(identity, links);
        match submitter.submit(&request).await {
            Ok(reply) => {
                info!(
                    "Submitted {} URL(s) for research on behalf of '{}'",
                    request.urls.len(),
                    identity.email()
                );
                self.selected.clear();
                self.urls.clear();
                Ok(reply)
            }
            Err(e) => {
                warn!(
                    event_name = "leads.submission.failed",
                    event_domain = "leads",
                    "Error submitting webhook: {:?}",
                    e
                );
                Err(e)
            }
        }
    }
}
