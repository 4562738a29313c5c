//! SQLite-backed adapters for the listener and responder store seams.

use async_trait::async_trait;
use database::{high_water_mark, invitee, Database};
use responder_core::{InviteeRegistry, ReplyError};
use stream_listener::{HighWaterMarkStore, ListenerError};

/// High-water-mark store backed by the SQLite `seen_event` row.
#[derive(Debug, Clone)]
pub struct SqliteMarkStore {
    db: Database,
}

impl SqliteMarkStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HighWaterMarkStore for SqliteMarkStore {
    async fn load(&self) -> Result<u64, ListenerError> {
        let mark = high_water_mark::load(self.db.pool())
            .await
            .map_err(|e| ListenerError::Store(e.to_string()))?;
        // Empty store on first run reads as zero.
        Ok(mark.unwrap_or(0).max(0) as u64)
    }

    async fn store(&self, id: u64) -> Result<(), ListenerError> {
        let id = i64::try_from(id).map_err(|e| ListenerError::Store(e.to_string()))?;
        high_water_mark::store(self.db.pool(), id)
            .await
            .map_err(|e| ListenerError::Store(e.to_string()))
    }
}

/// Invitee registry backed by the SQLite `invitees` table.
#[derive(Debug, Clone)]
pub struct SqliteInvitees {
    db: Database,
}

impl SqliteInvitees {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InviteeRegistry for SqliteInvitees {
    async fn is_invitee(&self, username: &str) -> Result<bool, ReplyError> {
        invitee::is_invitee(self.db.pool(), username)
            .await
            .map_err(|e| ReplyError::Store(e.to_string()))
    }

    async fn record_invitee(&self, username: &str) -> Result<(), ReplyError> {
        invitee::insert_invitee(self.db.pool(), username)
            .await
            .map_err(|e| ReplyError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn mark_store_defaults_to_zero() {
        let store = SqliteMarkStore::new(test_db().await);
        assert_eq!(store.load().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_store_round_trips() {
        let store = SqliteMarkStore::new(test_db().await);
        store.store(799_999_999_999_999_999).await.unwrap();
        assert_eq!(store.load().await.unwrap(), 799_999_999_999_999_999);
    }

    #[tokio::test]
    async fn invitees_round_trip() {
        let invitees = SqliteInvitees::new(test_db().await);
        assert!(!invitees.is_invitee("someone").await.unwrap());
        invitees.record_invitee("someone").await.unwrap();
        assert!(invitees.is_invitee("someone").await.unwrap());
    }
}
