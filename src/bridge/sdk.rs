use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the provider hands back after a successful sign-in.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialResponse {
    /// The signed token (a JWT) carrying the user's claims.
    pub credential: String,
}

/// Callback registered with the SDK at configuration time.
pub type CredentialCallback = Arc<dyn Fn(CredentialResponse) + Send + Sync>;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UxMode {
    Popup,
    Redirect,
}

/// Arguments to the SDK's one-time `initialize` entry point.
#[derive(Clone)]
pub struct IdConfiguration {
    pub client_id: String,
    pub callback: CredentialCallback,
    pub auto_select: bool,
    pub cancel_on_tap_outside: bool,
    pub ux_mode: UxMode,
}

impl IdConfiguration {
    /// The configuration the landing page always uses: popup sign-in,
    /// no automatic account selection, dismiss on outside tap.
    pub fn popup(client_id: impl Into<String>, callback: CredentialCallback) -> Self {
        IdConfiguration {
            client_id: client_id.into(),
            callback,
            auto_select: false,
            cancel_on_tap_outside: true,
            ux_mode: UxMode::Popup,
        }
    }
}

impl fmt::Debug for IdConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdConfiguration")
            .field("client_id", &self.client_id)
            .field("auto_select", &self.auto_select)
            .field("cancel_on_tap_outside", &self.cancel_on_tap_outside)
            .field("ux_mode", &self.ux_mode)
            .finish_non_exhaustive()
    }
}

/// Visual parameters for the provider-drawn sign-in button.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ButtonOptions {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(rename = "type", default = "default_button_type")]
    pub button_type: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_shape")]
    pub shape: String,
    #[serde(default = "default_logo_alignment")]
    pub logo_alignment: String,
    /// Pixel width.
    #[serde(default = "default_width")]
    pub width: u32,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        ButtonOptions {
            theme: default_theme(),
            size: default_size(),
            button_type: default_button_type(),
            text: default_text(),
            shape: default_shape(),
            logo_alignment: default_logo_alignment(),
            width: default_width(),
        }
    }
}

fn default_theme() -> String {
    "outline".to_string()
}

fn default_size() -> String {
    "large".to_string()
}

fn default_button_type() -> String {
    "standard".to_string()
}

fn default_text() -> String {
    "signin_with".to_string()
}

fn default_shape() -> String {
    "rectangular".to_string()
}

fn default_logo_alignment() -> String {
    "left".to_string()
}

fn default_width() -> u32 {
    200
}

/// Identifies a place in the page the SDK may draw its button into.
///
/// Equality is by identity, not by label: two handles created with the same
/// label are different mounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountHandle {
    id: Uuid,
    label: String,
}

impl MountHandle {
    pub fn new(label: impl Into<String>) -> Self {
        MountHandle {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for MountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.id)
    }
}

/// The identity provider's client library (`google.accounts.id`).
///
/// Implementations report errors as strings; the bridge logs them and never
/// lets them reach the session layer.
pub trait IdentitySdk: Send + Sync {
    /// Whether the library has loaded and its entry points can be called.
    fn is_available(&self) -> bool;
    fn initialize(&self, config: IdConfiguration) -> Result<(), String>;
    fn render_button(&self, mount: &MountHandle, options: &ButtonOptions) -> Result<(), String>;
    /// Shows the one-tap / account chooser prompt.
    fn prompt(&self) -> Result<(), String>;
    fn disable_auto_select(&self) -> Result<(), String>;
}

/// Stand-in for environments where the provider script can never load
/// (headless runs, blocked networks). Always unavailable.
pub struct NoSdk;

impl NoSdk {
    pub fn new() -> Self {
        NoSdk
    }
}

impl Default for NoSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentitySdk for NoSdk {
    fn is_available(&self) -> bool {
        false
    }

    fn initialize(&self, _config: IdConfiguration) -> Result<(), String> {
        Err("Identity SDK is not loaded".into())
    }

    fn render_button(&self, _mount: &MountHandle, _options: &ButtonOptions) -> Result<(), String> {
        Err("Identity SDK is not loaded".into())
    }

    fn prompt(&self) -> Result<(), String> {
        Err("Identity SDK is not loaded".into())
    }

    fn disable_auto_select(&self) -> Result<(), String> {
        Err("Identity SDK is not loaded".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_button_options_serialize_in_provider_shape() {
        assert_eq!(
            serde_json::to_value(ButtonOptions::default()).unwrap(),
            json!({
                "theme": "outline",
                "size": "large",
                "type": "standard",
                "text": "signin_with",
                "shape": "rectangular",
                "logo_alignment": "left",
                "width": 200
            })
        );
    }

    #[test]
    fn test_popup_configuration_flags() {
        let config = IdConfiguration::popup("client", Arc::new(|_: CredentialResponse| {}));
        assert!(!config.auto_select);
        assert!(config.cancel_on_tap_outside);
        assert_eq!(config.ux_mode, UxMode::Popup);
        assert!(format!("{:?}", config).contains("client"));
    }

    #[test]
    fn test_mount_handles_with_same_label_differ() {
        assert_ne!(MountHandle::new("header"), MountHandle::new("header"));
    }
}
