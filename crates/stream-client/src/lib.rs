//! Upstream filtered-stream client library.
//!
//! This crate provides a Rust client for the upstream social-media filtering
//! service. It supports:
//!
//! - Replacing the server-side filter rule set
//! - Consuming the long-lived event stream (newline-delimited JSON)
//! - Extracting comparable event identifiers from composite upstream ids
//!
//! # Example
//!
//! ```no_run
//! use stream_client::{StreamClient, StreamConfig, StreamMessage};
//!
//! # async fn example() -> Result<(), stream_client::StreamError> {
//! let config = StreamConfig::new(
//!     "https://stream.example.com/stream.json",
//!     "https://api.example.com/rules.json",
//!     "user",
//!     "secret",
//! );
//! let client = StreamClient::new(config)?;
//!
//! // Consume the event stream
//! use futures::StreamExt;
//! let mut stream = client.open_stream().await?;
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(StreamMessage::Activity(activity)) => {
//!             println!("event {:?} from {:?}", activity.event_id(), activity.author());
//!         }
//!         Ok(_) => {} // system message or keepalive
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod rules;
pub mod stream;
pub mod types;

pub use client::StreamClient;
pub use config::StreamConfig;
pub use error::StreamError;
pub use rules::{rules_from_mapping, Rule};
pub use stream::{EventStream, StreamMessage};
pub use types::{
    Actor, Geo, LanguageAnnotation, MatchedRule, ProviderMeta, SharedObject, StreamActivity,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
