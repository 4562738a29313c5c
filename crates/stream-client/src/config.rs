//! Configuration types for the stream client.

/// Configuration for connecting to the upstream filtering service.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// URL of the long-lived event stream endpoint.
    pub stream_url: String,
    /// URL of the rule replacement endpoint.
    pub rules_url: String,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Backfill window in minutes requested on connect (0 disables backfill).
    pub backfill_minutes: u32,
}

impl StreamConfig {
    /// Create a new configuration without a backfill window.
    pub fn new(
        stream_url: impl Into<String>,
        rules_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            stream_url: stream_url.into(),
            rules_url: rules_url.into(),
            username: username.into(),
            password: password.into(),
            backfill_minutes: 0,
        }
    }

    /// Set the backfill window requested on connect.
    pub fn with_backfill_minutes(mut self, minutes: u32) -> Self {
        self.backfill_minutes = minutes;
        self
    }

    /// Get the stream connect URL (with backfill query param if set).
    pub fn connect_url(&self) -> String {
        if self.backfill_minutes > 0 {
            format!("{}?backfillMinutes={}", self.stream_url, self.backfill_minutes)
        } else {
            self.stream_url.clone()
        }
    }
}
