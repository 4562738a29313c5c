//! Error types for the stream listener.

use thiserror::Error;

/// Errors that can occur during stream listening and event processing.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Error from the stream transport.
    #[error("stream error: {0}")]
    Stream(#[from] stream_client::StreamError),

    /// Error from the high-water-mark store.
    #[error("high-water-mark store error: {0}")]
    Store(String),

    /// An event was missing fields required for processing.
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}
