//! DeFiLlama `/pools` wire types and Euro-pool filtering

use serde::{Deserialize, Serialize};

use crate::domain::{risk_tags, YieldQuote};

/// Euro-pegged symbols the dashboard tracks
pub const DEFAULT_EURO_ASSETS: &[&str] = &["EURC", "EURS", "agEUR", "eEUR", "EURe", "EURA"];

/// Chains as DeFiLlama spells them
pub const DEFAULT_TARGET_CHAINS: &[&str] = &["Ethereum", "Arbitrum", "Optimism", "Base", "Polygon"];

/// Pools at or below this TVL are dropped
pub const DEFAULT_MIN_TVL: f64 = 10_000.0;

#[derive(Debug, Deserialize)]
pub struct PoolsResponse {
    pub data: Vec<LlamaPool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlamaPool {
    pub chain: String,
    pub project: String,
    pub symbol: String,
    #[serde(rename = "tvlUsd", default)]
    pub tvl_usd: f64,
    #[serde(default)]
    pub apy: Option<f64>,
    /// DeFiLlama pool id
    #[serde(default)]
    pub pool: Option<String>,
}

/// How a pool symbol is tested against the asset allow-list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolMatch {
    /// Symbol contains an allowed asset ("EURC-USDC" passes for "EURC")
    #[default]
    Contains,
    /// Symbol equals an allowed asset
    Exact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolFilter {
    pub assets: Vec<String>,
    pub chains: Vec<String>,
    pub min_tvl: f64,
    pub symbol_match: SymbolMatch,
}

impl Default for PoolFilter {
    fn default() -> Self {
        Self {
            assets: DEFAULT_EURO_ASSETS.iter().map(|s| s.to_string()).collect(),
            chains: DEFAULT_TARGET_CHAINS.iter().map(|s| s.to_string()).collect(),
            min_tvl: DEFAULT_MIN_TVL,
            symbol_match: SymbolMatch::Contains,
        }
    }
}

impl PoolFilter {
    pub fn accepts(&self, pool: &LlamaPool) -> bool {
        self.has_euro_asset(&pool.symbol)
            && self.chains.iter().any(|c| c == &pool.chain)
            && pool.tvl_usd > self.min_tvl
    }

    fn has_euro_asset(&self, symbol: &str) -> bool {
        match self.symbol_match {
            SymbolMatch::Exact => self.assets.iter().any(|a| a == symbol),
            SymbolMatch::Contains => {
                let upper = symbol.to_uppercase();
                self.assets
                    .iter()
                    .any(|a| symbol.contains(a.as_str()) || upper.contains(a.as_str()))
            }
        }
    }

    /// Keep accepted pools in source order and map them to quotes
    pub fn apply(&self, pools: Vec<LlamaPool>) -> Vec<YieldQuote> {
        pools
            .into_iter()
            .filter(|p| self.accepts(p))
            .map(to_quote)
            .collect()
    }
}

fn to_quote(pool: LlamaPool) -> YieldQuote {
    let apy = pool.apy.unwrap_or(0.0);
    YieldQuote {
        risk_tags: risk_tags(&pool.project, apy),
        protocol: pool.project,
        pool: pool.symbol.clone(),
        asset: pool.symbol,
        chain: pool.chain.to_lowercase(),
        apy,
        tvl: pool.tvl_usd,
    }
}
