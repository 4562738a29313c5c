//! Recording and failing sender implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use responder_core::{CardIssuer, ReplyError, ReplySender};

/// One reply captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub recipient: String,
    pub in_reply_to: u64,
    pub text: String,
}

/// A sender that records every reply and admin notice in memory.
///
/// Clones share the same buffers, so a test can keep a handle while the
/// dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    replies: Arc<Mutex<Vec<SentReply>>>,
    admin_notices: Arc<Mutex<Vec<String>>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All replies sent so far.
    pub fn replies(&self) -> Vec<SentReply> {
        self.replies.lock().unwrap().clone()
    }

    /// All admin notices sent so far.
    pub fn admin_notices(&self) -> Vec<String> {
        self.admin_notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn send_reply(
        &self,
        recipient: &str,
        in_reply_to: u64,
        text: &str,
    ) -> Result<(), ReplyError> {
        self.replies.lock().unwrap().push(SentReply {
            recipient: recipient.to_string(),
            in_reply_to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn notify_admin(&self, text: &str) -> Result<(), ReplyError> {
        self.admin_notices.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A sender that fails every call, for dispatch-fault tests.
#[derive(Debug, Clone, Default)]
pub struct FailingSender;

#[async_trait]
impl ReplySender for FailingSender {
    async fn send_reply(
        &self,
        _recipient: &str,
        _in_reply_to: u64,
        _text: &str,
    ) -> Result<(), ReplyError> {
        Err(ReplyError::SendFailed("mock send failure".to_string()))
    }

    async fn notify_admin(&self, _text: &str) -> Result<(), ReplyError> {
        Err(ReplyError::SendFailed("mock send failure".to_string()))
    }
}

/// A card issuer that returns a fixed link without any network.
#[derive(Debug, Clone)]
pub struct StubCards {
    link: String,
}

impl StubCards {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }
}

impl Default for StubCards {
    fn default() -> Self {
        Self::new("https://cards.example/stub/location")
    }
}

#[async_trait]
impl CardIssuer for StubCards {
    async fn request_card_link(
        &self,
        _username: &str,
        _language: &str,
    ) -> Result<String, ReplyError> {
        Ok(self.link.clone())
    }
}
