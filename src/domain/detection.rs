//! Turning raw on-chain balances into positions and idle holdings
//!
//! Balance reads come back positionally: result `i` belongs to query `i`.
//! Raw integers are scaled by `10^decimals` with `rust_decimal`, so the
//! conversion is exact up to the final `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::chain::Chain;
use super::registry::{EuroToken, ProtocolPosition};

/// Positions at or below this many units are not reported
pub const DUST_THRESHOLD: f64 = 0.01;

/// One `balanceOf` read to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceQuery {
    pub token: String,
    pub chain: Chain,
    pub decimals: u8,
}

/// Outcome of one `balanceOf` read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceResult {
    Success { raw: u128 },
    Failure { reason: String },
}

impl BalanceResult {
    pub fn raw(&self) -> Option<u128> {
        match self {
            BalanceResult::Success { raw } => Some(*raw),
            BalanceResult::Failure { .. } => None,
        }
    }
}

/// A receipt-token holding above the dust threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPosition {
    /// "{protocol_slug}-{asset}-{chain_id}"
    pub id: String,
    pub protocol: String,
    pub protocol_slug: String,
    pub pool_name: String,
    pub asset: String,
    /// Display name ("Ethereum")
    pub chain: String,
    pub chain_id: u64,
    /// Human units
    pub balance: f64,
    pub raw_balance: u128,
    pub receipt_token: String,
}

/// Plain stablecoin sitting in the wallet, earning nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub name: String,
    pub balance: f64,
    /// Balance at an assumed 1:1 EUR peg
    pub value: f64,
    pub chain_id: u64,
    pub token_address: String,
}

/// Scale a raw integer balance down by `10^decimals`
pub fn scale_balance(raw: u128, decimals: u8) -> f64 {
    let exact = i128::try_from(raw)
        .ok()
        .and_then(|raw| Decimal::try_from_i128_with_scale(raw, u32::from(decimals)).ok())
        .and_then(|d| d.to_f64());
    // Beyond 96 bits of mantissa or 28 decimals, fall back to float division.
    exact.unwrap_or_else(|| raw as f64 / 10f64.powi(i32::from(decimals)))
}

/// Balance queries for every receipt token, in table order
pub fn position_queries(positions: &[ProtocolPosition]) -> Vec<BalanceQuery> {
    positions
        .iter()
        .map(|p| BalanceQuery {
            token: p.receipt_token.to_string(),
            chain: p.chain,
            decimals: p.decimals,
        })
        .collect()
}

/// Balance queries for every (token, chain) deployment, in table order
pub fn token_queries(tokens: &[EuroToken]) -> Vec<BalanceQuery> {
    tokens
        .iter()
        .flat_map(|t| {
            t.addresses.iter().map(move |(chain, address)| BalanceQuery {
                token: address.to_string(),
                chain: *chain,
                decimals: t.decimals,
            })
        })
        .collect()
}

/// Materialize positions whose balance clears the dust threshold, largest first
pub fn detect_positions(positions: &[ProtocolPosition], results: &[BalanceResult]) -> Vec<DetectedPosition> {
    let mut detected: Vec<DetectedPosition> = positions
        .iter()
        .zip(results)
        .filter_map(|(position, result)| {
            let raw = result.raw()?;
            let balance = scale_balance(raw, position.decimals);
            if balance <= DUST_THRESHOLD {
                return None;
            }
            Some(DetectedPosition {
                id: format!("{}-{}-{}", position.protocol_slug, position.asset, position.chain.id()),
                protocol: position.protocol.to_string(),
                protocol_slug: position.protocol_slug.to_string(),
                pool_name: position.pool_name.to_string(),
                asset: position.asset.to_string(),
                chain: position.chain.name().to_string(),
                chain_id: position.chain.id(),
                balance,
                raw_balance: raw,
                receipt_token: position.receipt_token.to_string(),
            })
        })
        .collect();

    detected.sort_by(|a, b| b.balance.partial_cmp(&a.balance).unwrap_or(Ordering::Equal));
    detected
}

/// Collect non-zero stablecoin balances; results follow `token_queries` order
pub fn detect_idle_balances(tokens: &[EuroToken], results: &[BalanceResult]) -> Vec<TokenBalance> {
    let deployments = tokens
        .iter()
        .flat_map(|t| t.addresses.iter().map(move |(chain, address)| (t, *chain, *address)));

    deployments
        .zip(results)
        .filter_map(|((token, chain, address), result)| {
            let balance = scale_balance(result.raw()?, token.decimals);
            if balance <= 0.0 {
                return None;
            }
            Some(TokenBalance {
                symbol: token.symbol.to_string(),
                name: token.name.to_string(),
                balance,
                value: balance,
                chain_id: chain.id(),
                token_address: address.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::{all_protocol_positions, EURO_TOKENS};
    use approx::assert_relative_eq;

    fn ok(raw: u128) -> BalanceResult {
        BalanceResult::Success { raw }
    }

    fn failed() -> BalanceResult {
        BalanceResult::Failure { reason: "execution reverted".to_string() }
    }

    #[test]
    fn test_scale_balance() {
        assert_eq!(scale_balance(5_000_000_000, 6), 5000.0);
        assert_relative_eq!(scale_balance(123, 2), 1.23);
        assert_relative_eq!(scale_balance(1_500_000_000_000_000_000, 18), 1.5);
        assert_eq!(scale_balance(0, 18), 0.0);
    }

    #[test]
    fn test_scale_balance_huge_values() {
        let scaled = scale_balance(u128::MAX, 18);
        assert!(scaled > 3.4e20);
    }

    #[test]
    fn test_dust_filter() {
        let all = all_protocol_positions();
        let positions = &all[..2]; // aave eth + arb, 6 decimals
        let results = vec![ok(9_000), ok(11_000)];

        let detected = detect_positions(positions, &results);
        assert_eq!(detected.len(), 1);
        assert_relative_eq!(detected[0].balance, 0.011);
        assert_eq!(detected[0].chain, "Arbitrum");
    }

    #[test]
    fn test_failed_reads_are_skipped() {
        let all = all_protocol_positions();
        let positions = &all[..2];
        let detected = detect_positions(positions, &[failed(), ok(2_000_000)]);
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].raw_balance, 2_000_000);
    }

    #[test]
    fn test_positions_sorted_descending() {
        let all = all_protocol_positions();
        let positions = &all[..3];
        let detected = detect_positions(positions, &[ok(1_000_000), ok(9_000_000), ok(5_000_000)]);
        let balances: Vec<f64> = detected.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![9.0, 5.0, 1.0]);
    }

    #[test]
    fn test_position_identity() {
        let all = all_protocol_positions();
        let positions = &all[..1];
        let detected = detect_positions(positions, &[ok(5_000_000_000)]);
        assert_eq!(detected[0].id, "aave-v3-EURC-1");
        assert_eq!(detected[0].protocol, "Aave V3");
        assert_eq!(detected[0].chain_id, 1);
    }

    #[test]
    fn test_token_queries_follow_table_order() {
        let queries = token_queries(EURO_TOKENS);
        assert_eq!(queries.len(), 12);
        assert_eq!(queries[0].chain, Chain::Ethereum);
        assert_eq!(queries[5].decimals, 2); // first EURS deployment
    }

    #[test]
    fn test_idle_balances_keep_any_non_zero() {
        let queries = token_queries(EURO_TOKENS);
        let mut results = vec![ok(0); queries.len()];
        results[0] = ok(250_000_000); // 250 EURC on Ethereum
        results[5] = ok(1); // 0.01 EURS on Ethereum
        results[6] = failed();

        let idle = detect_idle_balances(EURO_TOKENS, &results);
        assert_eq!(idle.len(), 2);
        assert_eq!(idle[0].symbol, "EURC");
        assert_eq!(idle[0].value, 250.0);
        assert_eq!(idle[1].symbol, "EURS");
        assert_relative_eq!(idle[1].balance, 0.01);
    }

    #[test]
    fn test_short_result_list_is_tolerated() {
        let positions = all_protocol_positions();
        let detected = detect_positions(&positions, &[ok(3_000_000)]);
        assert_eq!(detected.len(), 1);
    }
}
