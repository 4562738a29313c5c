//! HTTP client for the upstream filtering service.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::rules::Rule;
use crate::stream::EventStream;

/// Client for the upstream filtering service: rule replacement and the
/// long-lived event stream.
#[derive(Debug, Clone)]
pub struct StreamClient {
    http: Client,
    config: StreamConfig,
}

impl StreamClient {
    /// Build a client from configuration.
    ///
    /// No overall request timeout is set: the stream connection is long-lived
    /// by design. Idle detection is the consumer's responsibility.
    pub fn new(config: StreamConfig) -> Result<Self, StreamError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(StreamError::Http)?;

        Ok(Self { http, config })
    }

    /// Replace the upstream's active rule set with `rules`.
    ///
    /// This is a full replace, not an incremental diff: whatever was active
    /// before is gone after a successful push. A non-success response is
    /// returned as [`StreamError::RuleRejected`]; callers decide whether that
    /// is fatal (it is, at startup).
    pub async fn replace_rules(&self, rules: &[Rule]) -> Result<(), StreamError> {
        info!("Replacing upstream rule set ({} rules)", rules.len());
        debug!("Rules: {}", serde_json::to_string(rules)?);

        let response = self
            .http
            .post(&self.config.rules_url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(rules)
            .send()
            .await
            .map_err(StreamError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::RuleRejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Rule set replaced");
        Ok(())
    }

    /// Open the long-lived event stream connection.
    ///
    /// Returns once the connection is established and the response status has
    /// been checked; the returned stream then yields messages until the
    /// connection drops.
    pub async fn open_stream(&self) -> Result<EventStream, StreamError> {
        let url = self.config.connect_url();
        info!("Connecting stream: {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(StreamError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Connection(format!("HTTP {}: {}", status, body)));
        }

        info!("Stream connected");
        Ok(EventStream::new(Box::pin(response.bytes_stream())))
    }

    /// Get the configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}
