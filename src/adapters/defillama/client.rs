//! DeFiLlama yields API client
//!
//! One GET against `/pools`, filtered down to Euro-stablecoin pools on the
//! supported chains.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{PoolFilter, PoolsResponse};
use crate::adapters::http::{send_with_retry, HttpError};
use crate::domain::YieldQuote;
use crate::ports::yields::{YieldError, YieldSource};

pub const DEFAULT_POOLS_URL: &str = "https://yields.llama.fi/pools";

#[derive(Debug, Clone)]
pub struct DefiLlamaConfig {
    pub api_url: String,
    pub filter: PoolFilter,
    /// Request timeout
    pub timeout: Duration,
    /// Number of attempts
    pub max_retries: u32,
}

impl Default for DefiLlamaConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_POOLS_URL.to_string(),
            filter: PoolFilter::default(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefiLlamaClient {
    config: DefiLlamaConfig,
    http: Client,
}

impl DefiLlamaClient {
    pub fn new() -> Result<Self, YieldError> {
        Self::with_config(DefiLlamaConfig::default())
    }

    pub fn with_config(config: DefiLlamaConfig) -> Result<Self, YieldError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| YieldError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &DefiLlamaConfig {
        &self.config
    }
}

#[async_trait]
impl YieldSource for DefiLlamaClient {
    async fn fetch_yields(&self) -> Result<Vec<YieldQuote>, YieldError> {
        let response = send_with_retry(self.config.max_retries, || {
            self.http.get(&self.config.api_url).send()
        })
        .await
        .map_err(|e| match e {
            HttpError::Server(status) => YieldError::ApiError {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or_default().to_string(),
            },
            other => YieldError::HttpError(other.to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YieldError::ApiError { status: status.as_u16(), body });
        }

        let pools: PoolsResponse = response
            .json()
            .await
            .map_err(|e| YieldError::ParseError(e.to_string()))?;

        let total = pools.data.len();
        let quotes = self.config.filter.apply(pools.data);
        tracing::debug!("DeFiLlama: kept {} of {} pools", quotes.len(), total);

        Ok(quotes)
    }
}
