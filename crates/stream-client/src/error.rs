//! Error types for the stream client.

use thiserror::Error;

/// Errors that can occur when interacting with the upstream filtering service.
#[derive(Debug, Error)]
pub enum StreamError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection to the stream endpoint failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The rule replacement push was rejected by the upstream.
    #[error("Rule push rejected: HTTP {status}: {body}")]
    RuleRejected { status: u16, body: String },

    /// An event carried an identifier that does not match the documented
    /// composite format.
    #[error("Malformed event identifier: {0}")]
    MalformedId(String),
}
