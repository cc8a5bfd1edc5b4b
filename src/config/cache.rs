use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A wrapper for the session cache configuration:
/// - enabled: if false, nothing is persisted (NoCache).
/// - backend: where the cache lives (memory, file).
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub backend: Option<CacheBackend>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            backend: Some(CacheBackend::Memory),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// The existing cache backends, selected by a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum CacheBackend {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File(FileCacheConfig),
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileCacheConfig {
    /// JSON file holding the key/value entries.
    pub path: String,
}
