//! Mock reply-sender implementations for testing.
//!
//! This crate provides in-memory implementations of the responder traits:
//! - [`RecordingSender`] - records every reply and admin notice
//! - [`FailingSender`] - fails every send, for dispatch-fault tests
//! - [`MemoryInvitees`] - an in-memory invitee registry
//! - [`StubCards`] - returns a fixed card link
//!
//! For production sending, wire real implementations in the binary instead.
//!
//! # Example
//!
//! ```rust
//! use mock_responder::RecordingSender;
//! use responder_core::ReplySender;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), responder_core::ReplyError> {
//! let sender = RecordingSender::new();
//! sender.send_reply("reporter1", 42, "hello").await?;
//! assert_eq!(sender.replies().len(), 1);
//! # Ok(())
//! # }
//! ```

mod invitees;
mod sender;

// Re-export responder-core types for convenience
pub use responder_core::{
    async_trait, CardIssuer, Classification, DisasterKind, InviteeRegistry, ReplyError,
    ReplySender,
};

pub use invitees::MemoryInvitees;
pub use sender::{FailingSender, RecordingSender, SentReply, StubCards};
