use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::logging::LoggingConfig;
use crate::bridge::ButtonOptions;

/// OAuth client identifier registered for the landing page.
pub const GOOGLE_CLIENT_ID: &str =
    "800639975168-6uuh2k6c8qo606n5b71d18j4tg47iurr.apps.googleusercontent.com";

/// Research webhook that receives submitted leads.
pub const DEFAULT_WEBHOOK_URL: &str = "https://n8n.srv850687.hstgr.cloud/webhook/knowleadge";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub leads: LeadsConfig,
}

/// Load config from a YAML file, with `KNOWLEADGE_*` environment overrides
/// (nested keys separated by `__`, e.g. `KNOWLEADGE_AUTH__CLIENT_ID`).
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed("KNOWLEADGE_").split("__"));
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Settings for the identity provider bridge and session bootstrap.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AuthConfig {
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Interval between checks for the identity SDK.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Delay after which the session is reported ready even if the SDK never loaded.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    /// Upper bound on the SDK wait. Unbounded when absent.
    #[serde(default)]
    pub sdk_load_timeout_ms: Option<u64>,
    #[serde(default)]
    pub button: ButtonOptions,
}

impl AuthConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn sdk_load_timeout(&self) -> Option<Duration> {
        self.sdk_load_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            client_id: default_client_id(),
            poll_interval_ms: default_poll_interval_ms(),
            ready_timeout_ms: default_ready_timeout_ms(),
            sdk_load_timeout_ms: None,
            button: ButtonOptions::default(),
        }
    }
}

fn default_client_id() -> String {
    GOOGLE_CLIENT_ID.to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_ready_timeout_ms() -> u64 {
    1000
}

/// Where and how submitted leads are delivered.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LeadsConfig {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "default_webhook_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        LeadsConfig {
            webhook_url: default_webhook_url(),
            timeout_ms: default_webhook_timeout_ms(),
        }
    }
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_webhook_timeout_ms() -> u64 {
    10_000
}
