//! Error types for the reply side.

use thiserror::Error;

/// Errors that can occur while dispatching a reply.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The card-issuing service returned a non-success response.
    #[error("Card request failed: HTTP {status}: {body}")]
    Card { status: u16, body: String },

    /// No dialogue text configured for the requested language (or default).
    #[error("No dialogue text for language: {0}")]
    MissingDialogue(String),

    /// Sending the outbound reply failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Invitee bookkeeping failed.
    #[error("Invitee store error: {0}")]
    Store(String),
}
