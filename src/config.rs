use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "BITHOMP_API_KEY";

const BITHOMP_BASE_URL: &str = "https://bithomp.com";
const MALLARD_ISSUER: &str = "raaoPU9crbLGEFCMyh8moNH4gipsHJY3wN";
// "MALLARD" as a 160-bit XRPL currency code
const MALLARD_CURRENCY: &str = "4D414C4C41524400000000000000000000000000";
const STATS_OUTPUT_PATH: &str = "stats.json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub issuer: String,
    pub currency: String,
    pub output_path: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads the configuration from the process environment. Only the API key
    /// comes from the environment; everything else is fixed.
    pub fn load() -> Result<Self> {
        Self::from_api_key(env::var(API_KEY_ENV).ok())
            .with_context(|| format!("{} not set in environment", API_KEY_ENV))
    }

    pub fn from_api_key(api_key: Option<String>) -> Result<Self> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            Some(_) => Err(anyhow!("{} is empty or whitespace", API_KEY_ENV)),
            None => Err(anyhow!("{} is missing", API_KEY_ENV)),
        }
    }

    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base_url: BITHOMP_BASE_URL.to_string(),
            issuer: MALLARD_ISSUER.to_string(),
            currency: MALLARD_CURRENCY.to_string(),
            output_path: PathBuf::from(STATS_OUTPUT_PATH),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    #[cfg(test)]
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/api/v2/token/{}/{}",
            self.api_base_url, self.issuer, self.currency
        )
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("issuer", &self.issuer)
            .field("currency", &self.currency)
            .field("output_path", &self.output_path)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
