//! Deduplication gate over the durable high-water mark.

use tracing::debug;

use crate::error::ListenerError;
use crate::store::HighWaterMarkStore;

/// Admits each event id at most once, tolerating replays from reconnect
/// backfills.
///
/// The contract is compare-then-conditionally-record: an event is admitted
/// and the mark durably advanced iff its id is strictly greater than the
/// current mark; a rejected event never mutates the mark. The gate is driven
/// from the single event loop, so checks are serialized by construction.
pub struct DedupGate<M> {
    store: M,
    mark: u64,
}

impl<M: HighWaterMarkStore> DedupGate<M> {
    /// Create a gate with a zero in-memory mark. Call [`reload`](Self::reload)
    /// before processing.
    pub fn new(store: M) -> Self {
        Self { store, mark: 0 }
    }

    /// Re-read the mark from the durable store. Called before every connect:
    /// an external process may have advanced it, and a stale in-memory value
    /// would re-admit events already durably marked seen.
    pub async fn reload(&mut self) -> Result<(), ListenerError> {
        self.mark = self.store.load().await?;
        debug!("Loaded high-water mark: {}", self.mark);
        Ok(())
    }

    /// Admit `event_id` if it is strictly newer than the current mark,
    /// durably recording it as the new mark. Returns false (with no write)
    /// otherwise.
    pub async fn admit(&mut self, event_id: u64) -> Result<bool, ListenerError> {
        if event_id <= self.mark {
            debug!(
                "Rejecting event {} (mark is {})",
                event_id, self.mark
            );
            return Ok(false);
        }

        self.store.store(event_id).await?;
        self.mark = event_id;
        Ok(true)
    }

    /// The current in-memory mark.
    pub fn mark(&self) -> u64 {
        self.mark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryMarkStore;

    #[tokio::test]
    async fn ascending_ids_are_admitted_and_replay_rejected() {
        let store = MemoryMarkStore::default();
        let mut gate = DedupGate::new(store.clone());
        gate.reload().await.unwrap();

        assert!(gate.admit(10).await.unwrap());
        assert!(gate.admit(11).await.unwrap());
        assert!(gate.admit(12).await.unwrap());

        // Replaying an already-seen id is rejected and the mark unchanged.
        assert!(!gate.admit(11).await.unwrap());
        assert_eq!(store.current(), 12);
    }

    #[tokio::test]
    async fn equal_id_is_rejected() {
        let mut gate = DedupGate::new(MemoryMarkStore::new(5));
        gate.reload().await.unwrap();
        assert!(!gate.admit(5).await.unwrap());
    }

    #[tokio::test]
    async fn reload_picks_up_external_advance() {
        let store = MemoryMarkStore::default();
        let mut gate = DedupGate::new(store.clone());
        gate.reload().await.unwrap();
        assert!(gate.admit(3).await.unwrap());

        // Another process advances the durable mark.
        store.store(100).await.unwrap();
        gate.reload().await.unwrap();
        assert!(!gate.admit(50).await.unwrap());
        assert!(gate.admit(101).await.unwrap());
    }

    #[tokio::test]
    async fn rejected_admission_performs_no_write() {
        let store = MemoryMarkStore::new(20);
        let mut gate = DedupGate::new(store.clone());
        gate.reload().await.unwrap();
        assert!(!gate.admit(7).await.unwrap());
        assert_eq!(store.current(), 20);
    }
}
