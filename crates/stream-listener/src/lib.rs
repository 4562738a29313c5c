//! Stream lifecycle management and event classification.
//!
//! This crate is the core of the report stream bot. It keeps exactly one
//! logical stream connection alive against an unreliable upstream and runs
//! every inbound event through a sequential pipeline:
//!
//! 1. [`DedupGate`] admits only events strictly newer than the durable
//!    high-water mark
//! 2. [`EventClassifier`] produces exactly one routing decision
//! 3. the dispatcher acts on it (reply, welcome, or nothing)
//!
//! [`ConnectionManager`] owns the connection state machine: reconnect with
//! bounded exponential backoff, idle-timeout detection, a once-per-outage
//! operator notice, and a high-water-mark reload before every connect.
//!
//! # Example
//!
//! ```no_run
//! use responder_core::{Dialogue, ReplyDispatcher};
//! use stream_listener::{
//!     ClassifierConfig, ConnectionManager, DedupGate, EventClassifier, EventProcessor,
//!     ManagerConfig, MemoryMarkStore,
//! };
//! # async fn example(
//! #     transport: impl stream_listener::StreamTransport,
//! #     sender: impl responder_core::ReplySender + Clone + 'static,
//! #     invitees: impl responder_core::InviteeRegistry,
//! #     cards: impl responder_core::CardIssuer,
//! # ) -> Result<(), stream_listener::ListenerError> {
//! let gate = DedupGate::new(MemoryMarkStore::default());
//! let classifier = EventClassifier::new(ClassifierConfig::default());
//! let dialogue = Dialogue::new("id");
//! let dispatcher = ReplyDispatcher::new(sender.clone(), invitees, cards, dialogue);
//! let processor = EventProcessor::new(gate, classifier, dispatcher);
//!
//! let manager = ConnectionManager::new(transport, processor, sender, ManagerConfig::default());
//! manager.run_with_shutdown(async { /* ctrl-c */ }).await
//! # }
//! ```

pub mod classifier;
pub mod dedup;
pub mod error;
pub mod manager;
pub mod processor;
pub mod store;
pub mod transport;

pub use classifier::{ClassifierConfig, EventClassifier, KeywordEntry};
pub use dedup::DedupGate;
pub use error::ListenerError;
pub use manager::{ConnectionManager, ConnectionState, ManagerConfig};
pub use processor::{EventProcessor, EventSink, ProcessOutcome};
pub use store::{HighWaterMarkStore, MemoryMarkStore};
pub use transport::StreamTransport;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
