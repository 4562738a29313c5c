//! High-water-mark store seam.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ListenerError;

/// A durable single-value store for the last-processed event id.
///
/// Must tolerate being empty on first run: `load` returns zero then.
#[async_trait]
pub trait HighWaterMarkStore: Send + Sync {
    /// Read the stored mark (zero if nothing recorded yet).
    async fn load(&self) -> Result<u64, ListenerError>;

    /// Durably record `id` as the new mark.
    async fn store(&self, id: u64) -> Result<(), ListenerError>;
}

/// An in-memory mark store. Not durable; intended for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryMarkStore {
    mark: Arc<Mutex<u64>>,
}

impl MemoryMarkStore {
    pub fn new(mark: u64) -> Self {
        Self {
            mark: Arc::new(Mutex::new(mark)),
        }
    }

    /// Current stored value (test inspection).
    pub fn current(&self) -> u64 {
        *self.mark.lock().unwrap()
    }
}

#[async_trait]
impl HighWaterMarkStore for MemoryMarkStore {
    async fn load(&self) -> Result<u64, ListenerError> {
        Ok(*self.mark.lock().unwrap())
    }

    async fn store(&self, id: u64) -> Result<(), ListenerError> {
        *self.mark.lock().unwrap() = id;
        Ok(())
    }
}
