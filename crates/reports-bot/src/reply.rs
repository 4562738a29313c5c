//! HTTP reply sender: hands outbound replies to the engagement service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use responder_core::{ReplyError, ReplySender};
use serde::Serialize;
use tracing::{debug, info};

/// Configuration for the engagement service.
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    /// Base URL; `/replies` and `/notices` are appended.
    pub base_url: String,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    recipient: &'a str,
    in_reply_to_id: u64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct NoticeRequest<'a> {
    text: &'a str,
}

/// Sends replies and operator notices over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReplySender {
    http: Client,
    config: ReplyConfig,
}

impl HttpReplySender {
    pub fn new(config: ReplyConfig) -> Result<Self, ReplyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ReplyError::Http)?;
        Ok(Self { http, config })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ReplyError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(ReplyError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::SendFailed(format!("HTTP {}: {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySender for HttpReplySender {
    async fn send_reply(
        &self,
        recipient: &str,
        in_reply_to: u64,
        text: &str,
    ) -> Result<(), ReplyError> {
        info!("Sending reply to {} (event {})", recipient, in_reply_to);
        self.post(
            "/replies",
            &ReplyRequest {
                recipient,
                in_reply_to_id: in_reply_to,
                text,
            },
        )
        .await
    }

    async fn notify_admin(&self, text: &str) -> Result<(), ReplyError> {
        info!("Sending operator notice");
        self.post("/notices", &NoticeRequest { text }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_request_serializes_expected_body() {
        let request = ReplyRequest {
            recipient: "reporter1",
            in_reply_to_id: 42,
            text: "hello",
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"recipient":"reporter1","inReplyToId":42,"text":"hello"}"#
        );
    }
}
