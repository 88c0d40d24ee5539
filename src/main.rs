use dotenv::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod api;
mod config;
mod error;
mod fetcher;
mod models;

use crate::config::Config;
use crate::fetcher::StatsFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Load environment variables
    dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("ERROR: {:#}", e);
            return ExitCode::from(1);
        }
    };
    info!("Configuration loaded: {:?}", config);

    match StatsFetcher::new(config).fetch_token_data().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_transport() {
                info!("Zeroed stats written after fetch failure");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
