//! Reply sender and invitee registry capability traits.

use async_trait::async_trait;

use crate::error::ReplyError;

/// The narrow capability for sending outbound messages.
///
/// Abstracted to support different transports (the real network, tests).
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send a reply to `recipient`, threaded onto the event with the given
    /// upstream-native id.
    async fn send_reply(
        &self,
        recipient: &str,
        in_reply_to: u64,
        text: &str,
    ) -> Result<(), ReplyError>;

    /// Send an operator-facing notice (e.g., to an administrative account).
    async fn notify_admin(&self, text: &str) -> Result<(), ReplyError>;
}

/// Capability for obtaining a reporting-card link for a user.
///
/// Implemented by [`crate::CardClient`] for the real service and by test
/// doubles elsewhere.
#[async_trait]
pub trait CardIssuer: Send + Sync {
    async fn request_card_link(&self, username: &str, language: &str)
        -> Result<String, ReplyError>;
}

/// First-contact bookkeeping: which users have already been invited.
#[async_trait]
pub trait InviteeRegistry: Send + Sync {
    /// Whether `username` has already been invited to participate.
    async fn is_invitee(&self, username: &str) -> Result<bool, ReplyError>;

    /// Record `username` as invited.
    async fn record_invitee(&self, username: &str) -> Result<(), ReplyError>;
}
