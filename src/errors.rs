//! Error types shared across the crate.
//!
//! Failures inside the auth bridge are logged at the boundary and never
//! returned to the presentation layer; these types exist so the conditions
//! can be named, recorded and tested.

use thiserror::Error;

/// Conditions raised while establishing or restoring a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider-issued credential could not be decoded into an identity.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    /// The cached session entry is not a serialized identity.
    #[error("cached session is corrupt: {0}")]
    CacheCorrupt(String),

    /// The identity SDK never became available (or refused configuration).
    #[error("identity provider SDK is unavailable")]
    ProviderUnavailable,
}

/// Errors from a durable cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcomes of the lead form's submit action that the user must be told about.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeadError {
    #[error("Please enter at least one URL")]
    NoUrls,

    #[error("Please sign in first")]
    NotSignedIn,

    /// Non-2xx status, non-JSON body or transport failure.
    #[error("Error submitting request. Please try again.")]
    SubmissionFailed(String),
}
