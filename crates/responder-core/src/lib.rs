//! Core traits and types for the reply side of the report stream bot.
//!
//! This crate defines the shared interface between the stream-processing core
//! and whatever actually sends replies:
//!
//! - [`Classification`] / [`DisasterKind`] - routing decisions for events
//! - [`ReplySender`] - the narrow capability used to send replies and
//!   operator notices
//! - [`InviteeRegistry`] - first-contact bookkeeping
//! - [`Dialogue`] - injected per-language reply text tables
//! - [`CardClient`] - client for the card-issuing service
//! - [`ReplyDispatcher`] - turns a classification into outbound action
//!
//! # Example
//!
//! ```rust
//! use responder_core::{Classification, DisasterKind};
//!
//! let decision = Classification::SendResource {
//!     disaster: DisasterKind::Flood,
//!     language: "id".to_string(),
//! };
//! assert!(!matches!(decision, Classification::Ignore));
//! ```

mod card;
mod classification;
mod dialogue;
mod dispatcher;
mod error;
mod sender;

pub use card::{CardClient, CardConfig};
pub use classification::{Classification, DisasterKind};
pub use dialogue::Dialogue;
pub use dispatcher::{DispatchOutcome, ReplyDispatcher};
pub use error::ReplyError;
pub use sender::{CardIssuer, InviteeRegistry, ReplySender};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
