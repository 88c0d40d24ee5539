use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::StatsError;
use crate::models::token::TokenResponse;

const API_TOKEN_HEADER: &str = "x-bithomp-token";

#[derive(Debug, Clone)]
pub struct BithompClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl BithompClient {
    pub fn new(config: &Config) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                StatsError::Unexpected(format!("Failed to create HTTP client for Bithomp: {}", e))
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.clone(),
            client,
        })
    }

    /// Fetches the token object from /api/v2/token/{issuer}/{currency}.
    pub async fn get_token(&self, issuer: &str, currency: &str) -> Result<TokenResponse, StatsError> {
        let url = format!("{}/api/v2/token/{}/{}", self.base_url, issuer, currency);

        debug!("Fetching token from Bithomp: {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_TOKEN_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Bithomp token API error: {} - {}", status, error_text);
            return Err(StatsError::Transport(format!("HTTP status {}", status)));
        }

        let body = response.bytes().await?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(token)) => Ok(token),
            Ok(other) => Err(StatsError::Unexpected(format!(
                "expected a JSON object from Bithomp, got: {}",
                other
            ))),
            Err(e) => Err(StatsError::Unexpected(format!(
                "Failed to parse Bithomp token response: {}",
                e
            ))),
        }
    }
}
