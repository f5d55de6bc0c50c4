//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/default.toml.
//! Every section is optional; missing values fall back to the public defaults.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::defillama::{DefiLlamaConfig, PoolFilter, SymbolMatch, DEFAULT_POOLS_URL};
use crate::adapters::evm::EvmRpcConfig;
use crate::domain::alert::DEFAULT_COOLDOWN_HOURS;
use crate::domain::{is_evm_address, Chain};

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wallet: WalletSection,
    pub rpc: RpcSection,
    pub yields: YieldsSection,
    pub portfolio: PortfolioSection,
    pub alerts: AlertsSection,
}

/// Wallet to track
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalletSection {
    /// Owner address; CLI argument and RENDITE_WALLET_ADDRESS take precedence
    pub address: Option<String>,
}

impl WalletSection {
    /// Get address with environment variable override
    pub fn get_address(&self) -> Option<String> {
        std::env::var("RENDITE_WALLET_ADDRESS")
            .ok()
            .filter(|a| !a.is_empty())
            .or_else(|| self.address.clone())
    }
}

/// JSON-RPC endpoints, keyed by chain ("ethereum", "base", ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    pub endpoints: HashMap<String, String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for RpcSection {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            timeout_secs: 15,
            max_retries: 3,
        }
    }
}

impl RpcSection {
    /// Resolve endpoints, applying RENDITE_RPC_<CHAIN> overrides
    pub fn get_endpoints(&self) -> Result<HashMap<Chain, String>, ConfigError> {
        self.endpoints_with(|name| std::env::var(name).ok())
    }

    fn endpoints_with<F>(&self, env: F) -> Result<HashMap<Chain, String>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolved = HashMap::new();
        for (key, url) in &self.endpoints {
            let chain = Chain::from_key(key).ok_or_else(|| {
                ConfigError::ValidationError(format!("unknown chain in [rpc.endpoints]: {}", key))
            })?;
            resolved.insert(chain, url.clone());
        }

        for chain in Chain::ALL {
            let var = format!("RENDITE_RPC_{}", chain.key().to_uppercase());
            if let Some(url) = env(&var).filter(|u| !u.is_empty()) {
                resolved.insert(chain, url);
            }
        }

        Ok(resolved)
    }

    pub fn to_evm_config(&self) -> Result<EvmRpcConfig, ConfigError> {
        Ok(EvmRpcConfig {
            endpoints: self.get_endpoints()?,
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
        })
    }
}

/// Yield aggregator settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YieldsSection {
    pub api_url: String,
    /// Euro asset allow-list
    pub assets: Vec<String>,
    /// Chain allow-list, DeFiLlama spelling
    pub chains: Vec<String>,
    /// Pools must have strictly more TVL than this
    pub min_tvl: f64,
    /// "contains" or "exact"
    pub symbol_match: SymbolMatch,
    /// How long a fetched quote list is reused
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for YieldsSection {
    fn default() -> Self {
        let filter = PoolFilter::default();
        Self {
            api_url: DEFAULT_POOLS_URL.to_string(),
            assets: filter.assets,
            chains: filter.chains,
            min_tvl: filter.min_tvl,
            symbol_match: filter.symbol_match,
            cache_ttl_secs: 300,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl YieldsSection {
    /// Get API URL with environment variable override
    pub fn get_api_url(&self) -> String {
        std::env::var("RENDITE_YIELDS_API_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.api_url.clone())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl From<&YieldsSection> for DefiLlamaConfig {
    fn from(section: &YieldsSection) -> Self {
        DefiLlamaConfig {
            api_url: section.get_api_url(),
            filter: PoolFilter {
                assets: section.assets.clone(),
                chains: section.chains.clone(),
                min_tvl: section.min_tvl,
                symbol_match: section.symbol_match,
            },
            timeout: Duration::from_secs(section.timeout_secs),
            max_retries: section.max_retries,
        }
    }
}

/// Refresh loop settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioSection {
    /// Seconds between refresh cycles in watch mode
    pub poll_interval_secs: u64,
}

impl Default for PortfolioSection {
    fn default() -> Self {
        Self { poll_interval_secs: 60 }
    }
}

/// Alert evaluation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsSection {
    /// Minimum hours between two notifications for one rule
    pub cooldown_hours: i64,
    /// Refuse to deliver alerts that carry no email
    pub require_recipient: bool,
}

impl Default for AlertsSection {
    fn default() -> Self {
        Self {
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            require_recipient: false,
        }
    }
}

impl AlertsSection {
    pub fn cooldown(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_hours(self.cooldown_hours).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "alerts.cooldown_hours is out of range: {}",
                self.cooldown_hours
            ))
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let raw = path.as_ref().to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(expand_path(path))?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref address) = self.wallet.address {
            if !is_evm_address(address) {
                return Err(ConfigError::ValidationError(format!(
                    "wallet.address is not an EVM address: {}",
                    address
                )));
            }
        }

        for (key, url) in &self.rpc.endpoints {
            if Chain::from_key(key).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "unknown chain in [rpc.endpoints]: {}",
                    key
                )));
            }
            if url.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "rpc endpoint for {} cannot be empty",
                    key
                )));
            }
        }

        if self.rpc.max_retries == 0 || self.yields.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "max_retries must be > 0".to_string(),
            ));
        }

        if self.yields.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "yields.api_url cannot be empty".to_string(),
            ));
        }

        if self.yields.assets.is_empty() {
            return Err(ConfigError::ValidationError(
                "yields.assets cannot be empty".to_string(),
            ));
        }

        if self.yields.min_tvl < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "yields.min_tvl must be >= 0, got {}",
                self.yields.min_tvl
            )));
        }

        if self.portfolio.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "portfolio.poll_interval_secs must be > 0".to_string(),
            ));
        }

        if self.alerts.cooldown_hours < 0 {
            return Err(ConfigError::ValidationError(format!(
                "alerts.cooldown_hours must be >= 0, got {}",
                self.alerts.cooldown_hours
            )));
        }
        self.alerts.cooldown()?;

        Ok(())
    }
}
