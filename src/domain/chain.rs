//! Supported EVM networks
//!
//! Chain ids, display names and config keys for the networks the tracker reads.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Optimism,
    Polygon,
    Arbitrum,
    Base,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Arbitrum,
        Chain::Base,
    ];

    /// EIP-155 chain id
    pub fn id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Optimism => 10,
            Chain::Polygon => 137,
            Chain::Arbitrum => 42161,
            Chain::Base => 8453,
        }
    }

    /// Display name, also the spelling DeFiLlama uses
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Optimism => "Optimism",
            Chain::Polygon => "Polygon",
            Chain::Arbitrum => "Arbitrum",
            Chain::Base => "Base",
        }
    }

    /// Lowercase key used in config files and env var suffixes
    pub fn key(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Optimism => "optimism",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Base => "base",
        }
    }

    pub fn from_id(id: u64) -> Option<Chain> {
        Chain::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Parse a config key or display name ("mainnet" is accepted for Ethereum)
    pub fn from_key(key: &str) -> Option<Chain> {
        let key = key.trim().to_lowercase();
        if key == "mainnet" {
            return Some(Chain::Ethereum);
        }
        Chain::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check for a `0x`-prefixed, 20-byte hex address
pub fn is_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
