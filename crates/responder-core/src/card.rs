//! Client for the card-issuing service.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ReplyError;

/// Configuration for the card-issuing service.
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Base URL of the card service (the `/cards` path is appended).
    pub base_url: String,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Network name reported with each card request.
    pub network: String,
    /// Prefix of the user-facing card link; the card id and `/location` are
    /// appended.
    pub card_url_prefix: String,
}

impl CardConfig {
    fn cards_url(&self) -> String {
        format!("{}/cards", self.base_url)
    }
}

/// Request body for a card.
#[derive(Debug, Serialize)]
struct CardRequest<'a> {
    username: &'a str,
    network: &'a str,
    language: &'a str,
}

/// Response from the card service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardResponse {
    card_id: String,
}

/// Client for requesting one-time reporting-card links.
#[derive(Debug, Clone)]
pub struct CardClient {
    http: Client,
    config: CardConfig,
}

impl CardClient {
    pub fn new(config: CardConfig) -> Result<Self, ReplyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ReplyError::Http)?;

        Ok(Self { http, config })
    }

    /// Request a card for `username` and return the user-facing link.
    pub async fn request_card_link(
        &self,
        username: &str,
        language: &str,
    ) -> Result<String, ReplyError> {
        let request = CardRequest {
            username,
            network: &self.config.network,
            language,
        };
        debug!("Requesting card for {}", username);

        let response = self
            .http
            .post(self.config.cards_url())
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ReplyError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Card {
                status: status.as_u16(),
                body,
            });
        }

        let card: CardResponse = response.json().await.map_err(ReplyError::Http)?;
        info!("Fetched card id: {}", card.card_id);

        Ok(format!(
            "{}{}/location",
            self.config.card_url_prefix, card.card_id
        ))
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl crate::sender::CardIssuer for CardClient {
    async fn request_card_link(
        &self,
        username: &str,
        language: &str,
    ) -> Result<String, ReplyError> {
        CardClient::request_card_link(self, username, language).await
    }
}
