use serde::{Deserialize, Serialize};

/// APY (percent) above which a pool is tagged "High Yield"
pub const HIGH_YIELD_APY: f64 = 10.0;

const AUDITED_PROTOCOLS: &[&str] = &["Aave V3", "Compound V3", "Morpho Blue"];

/// One pool from the yield aggregator
///
/// `tvl` is whatever currency the source reports (USD for DeFiLlama) and is
/// treated as roughly 1:1 with EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldQuote {
    pub protocol: String,
    pub pool: String,
    pub asset: String,
    pub chain: String,
    /// Percentage, 4.25 means 4.25%
    pub apy: f64,
    pub tvl: f64,
    #[serde(default)]
    pub risk_tags: Vec<String>,
}

impl YieldQuote {
    pub fn new(protocol: &str, pool: &str, asset: &str, chain: &str, apy: f64, tvl: f64) -> Self {
        Self {
            protocol: protocol.to_string(),
            pool: pool.to_string(),
            asset: asset.to_string(),
            chain: chain.to_string(),
            apy,
            tvl,
            risk_tags: risk_tags(protocol, apy),
        }
    }
}

/// Binary risk signals derived from the protocol name and rate
pub fn risk_tags(protocol: &str, apy: f64) -> Vec<String> {
    let mut tags = Vec::new();
    if apy > HIGH_YIELD_APY {
        tags.push("High Yield".to_string());
    }
    if AUDITED_PROTOCOLS.contains(&protocol) {
        tags.push("Audited".to_string());
    }
    if protocol.contains("Uniswap") {
        tags.push("Impermanent Loss".to_string());
    }
    tags
}
