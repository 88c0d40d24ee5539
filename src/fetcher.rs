use std::path::Path;

use tracing::{error, info};

use crate::api::bithomp::BithompClient;
use crate::config::Config;
use crate::error::StatsError;
use crate::models::token::TokenStats;

pub struct StatsFetcher {
    config: Config,
}

impl StatsFetcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the token, derives the stats and writes them to the output path.
    ///
    /// A transport failure still writes a zeroed record before the error is
    /// returned. Any other failure writes nothing.
    pub async fn fetch_token_data(&self) -> Result<TokenStats, StatsError> {
        match self.fetch_stats().await {
            Ok(stats) => {
                persist(&self.config.output_path, &stats).await?;
                info!("Stats updated successfully:\n{}", to_pretty(&stats)?);
                Ok(stats)
            }
            Err(StatsError::Transport(msg)) => {
                error!("Error fetching data: {}", msg);
                persist(&self.config.output_path, &TokenStats::zeroed()).await?;
                Err(StatsError::Transport(msg))
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    async fn fetch_stats(&self) -> Result<TokenStats, StatsError> {
        info!("Fetching Mallard token stats from {}", self.config.token_url());

        let client = BithompClient::new(&self.config)?;
        let token = client
            .get_token(&self.config.issuer, &self.config.currency)
            .await?;

        info!(
            "Received data: {}",
            serde_json::to_string_pretty(&token).unwrap_or_default()
        );

        TokenStats::from_response(&token)
    }
}

/// Overwrites `path` with the stats as two-space indented JSON.
pub async fn persist(path: &Path, stats: &TokenStats) -> Result<(), StatsError> {
    let mut contents = to_pretty(stats)?;
    contents.push('\n');
    tokio::fs::write(path, contents).await.map_err(|e| {
        StatsError::Unexpected(format!("Failed to write {}: {}", path.display(), e))
    })
}

fn to_pretty(stats: &TokenStats) -> Result<String, StatsError> {
    serde_json::to_string_pretty(stats)
        .map_err(|e| StatsError::Unexpected(format!("Failed to serialize stats: {}", e)))
}
