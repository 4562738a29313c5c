//! In-memory invitee registry.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use responder_core::{InviteeRegistry, ReplyError};

/// An invitee registry backed by an in-memory set.
#[derive(Debug, Clone, Default)]
pub struct MemoryInvitees {
    invited: Arc<Mutex<HashSet<String>>>,
}

impl MemoryInvitees {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the registry.
    pub fn with_invitee(self, username: impl Into<String>) -> Self {
        self.invited.lock().unwrap().insert(username.into());
        self
    }
}

#[async_trait]
impl InviteeRegistry for MemoryInvitees {
    async fn is_invitee(&self, username: &str) -> Result<bool, ReplyError> {
        Ok(self.invited.lock().unwrap().contains(username))
    }

    async fn record_invitee(&self, username: &str) -> Result<(), ReplyError> {
        self.invited.lock().unwrap().insert(username.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_reports_invitees() {
        let invitees = MemoryInvitees::new();
        assert!(!invitees.is_invitee("a").await.unwrap());
        invitees.record_invitee("a").await.unwrap();
        assert!(invitees.is_invitee("a").await.unwrap());
    }

    #[tokio::test]
    async fn with_invitee_pre_populates() {
        let invitees = MemoryInvitees::new().with_invitee("seed");
        assert!(invitees.is_invitee("seed").await.unwrap());
    }
}
