//! Portfolio aggregation
//!
//! Combines detected positions, idle balances and yield quotes into a
//! `PortfolioSummary`. Pure and total: failed or still-loading sources arrive
//! as empty snapshots and flow through the arithmetic as zeros.

use serde::{Deserialize, Serialize};

use super::detection::{DetectedPosition, TokenBalance};
use super::matcher::YieldMatcher;
use super::quote::YieldQuote;

/// APY (percent) assumed for a position with no matching quote
pub const DEFAULT_ESTIMATED_APY: f64 = 3.5;

/// Where a position's APY came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldSourceTag {
    Matched,
    Estimated,
}

impl YieldSourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            YieldSourceTag::Matched => "matched",
            YieldSourceTag::Estimated => "estimated",
        }
    }
}

/// Simple-interest earnings; fixed divisors, no calendar adjustment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

impl Earnings {
    pub fn from_yearly(yearly: f64) -> Self {
        Self {
            daily: yearly / 365.0,
            weekly: yearly / 52.0,
            monthly: yearly / 12.0,
            yearly,
        }
    }

    /// `balance * apy / 100` per year
    pub fn for_balance(balance: f64, apy: f64) -> Self {
        Self::from_yearly(balance * (apy / 100.0))
    }
}

impl std::iter::Sum for Earnings {
    fn sum<I: Iterator<Item = Earnings>>(iter: I) -> Self {
        iter.fold(Earnings::default(), |acc, e| Earnings {
            daily: acc.daily + e.daily,
            weekly: acc.weekly + e.weekly,
            monthly: acc.monthly + e.monthly,
            yearly: acc.yearly + e.yearly,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPosition {
    pub position: DetectedPosition,
    pub apy: f64,
    pub yield_source: YieldSourceTag,
    pub earnings: Earnings,
}

impl EnrichedPosition {
    /// Resolve APY against the quote snapshot, falling back to the estimate
    pub fn resolve(position: DetectedPosition, matcher: &YieldMatcher<'_>) -> Self {
        let matched = matcher.get_pool_apy(&position.protocol_slug, &position.asset, &position.chain);
        let (apy, yield_source) = match matched {
            Some(apy) => (apy, YieldSourceTag::Matched),
            None => (DEFAULT_ESTIMATED_APY, YieldSourceTag::Estimated),
        };
        let earnings = Earnings::for_balance(position.balance, apy);

        Self {
            position,
            apy,
            yield_source,
            earnings,
        }
    }
}

/// One source's latest result as seen by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSnapshot<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T: Default> SourceSnapshot<T> {
    pub fn loading() -> Self {
        Self {
            data: T::default(),
            is_loading: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: T::default(),
            is_loading: false,
            error: Some(error.into()),
        }
    }
}

impl<T> SourceSnapshot<T> {
    pub fn ready(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
        }
    }
}

impl<T: Default> Default for SourceSnapshot<T> {
    fn default() -> Self {
        Self::loading()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    // Deployed capital
    pub positions: Vec<EnrichedPosition>,
    pub position_count: usize,
    pub total_position_value: f64,

    // Wallet holdings outside any protocol
    pub raw_balances: Vec<TokenBalance>,
    pub total_raw_value: f64,

    pub total_value: f64,

    pub weighted_apy: f64,
    pub earnings: Earnings,

    pub idle_capital: f64,
    /// What idle capital would earn per day at the portfolio's own rate
    pub potential_daily_gain: f64,

    pub is_loading: bool,
    pub has_error: bool,
}

/// Aggregate the three source snapshots into portfolio metrics
///
/// Only the positions source feeds `has_error`; balance and yield failures
/// show up as empty data.
pub fn summarize(
    positions: &SourceSnapshot<Vec<DetectedPosition>>,
    balances: &SourceSnapshot<Vec<TokenBalance>>,
    yields: &SourceSnapshot<Vec<YieldQuote>>,
) -> PortfolioSummary {
    let mut summary = aggregate(&positions.data, &balances.data, &yields.data);
    summary.is_loading = positions.is_loading || balances.is_loading || yields.is_loading;
    summary.has_error = positions.error.is_some();
    summary
}

/// Status-free aggregation over plain lists
pub fn aggregate(
    positions: &[DetectedPosition],
    raw_balances: &[TokenBalance],
    quotes: &[YieldQuote],
) -> PortfolioSummary {
    let matcher = YieldMatcher::new(quotes);
    let enriched: Vec<EnrichedPosition> = positions
        .iter()
        .cloned()
        .map(|p| EnrichedPosition::resolve(p, &matcher))
        .collect();

    let total_position_value: f64 = enriched.iter().map(|p| p.position.balance).sum();
    let total_raw_value: f64 = raw_balances.iter().map(|b| b.value).sum();
    let total_value = total_position_value + total_raw_value;

    let weighted_apy = if total_position_value > 0.0 {
        let weighted_sum: f64 = enriched.iter().map(|p| p.apy * p.position.balance).sum();
        weighted_sum / total_position_value
    } else {
        0.0
    };

    let earnings: Earnings = enriched.iter().map(|p| p.earnings).sum();

    let idle_capital = total_raw_value;
    let effective_apy = if weighted_apy > 0.0 { weighted_apy } else { DEFAULT_ESTIMATED_APY };
    let potential_daily_gain = idle_capital * effective_apy / 100.0 / 365.0;

    PortfolioSummary {
        position_count: enriched.len(),
        positions: enriched,
        total_position_value,
        raw_balances: raw_balances.to_vec(),
        total_raw_value,
        total_value,
        weighted_apy,
        earnings,
        idle_capital,
        potential_daily_gain,
        is_loading: false,
        has_error: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn position(slug: &str, asset: &str, chain: &str, balance: f64) -> DetectedPosition {
        DetectedPosition {
            id: format!("{}-{}-{}", slug, asset, chain),
            protocol: slug.to_string(),
            protocol_slug: slug.to_string(),
            pool_name: format!("{} Supply", asset),
            asset: asset.to_string(),
            chain: chain.to_string(),
            chain_id: 1,
            balance,
            raw_balance: (balance * 1e6) as u128,
            receipt_token: "0x0000000000000000000000000000000000000001".to_string(),
        }
    }

    fn idle(symbol: &str, value: f64) -> TokenBalance {
        TokenBalance {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            balance: value,
            value,
            chain_id: 1,
            token_address: "0x0000000000000000000000000000000000000002".to_string(),
        }
    }

    #[test]
    fn test_earnings_divisors() {
        let e = Earnings::for_balance(5000.0, 4.25);
        assert_relative_eq!(e.yearly, 212.5);
        assert_relative_eq!(e.monthly, 212.5 / 12.0);
        assert_relative_eq!(e.weekly, 212.5 / 52.0);
        assert_relative_eq!(e.daily, 212.5 / 365.0);
    }

    #[test]
    fn test_empty_portfolio_is_all_zero() {
        let summary = aggregate(&[], &[], &[]);
        assert_eq!(summary.weighted_apy, 0.0);
        assert!(!summary.weighted_apy.is_nan());
        assert_eq!(summary.earnings, Earnings::default());
        assert_eq!(summary.position_count, 0);
        assert_eq!(summary.potential_daily_gain, 0.0);
    }

    #[test]
    fn test_weighted_apy_and_additivity() {
        let positions = vec![
            position("aave-v3", "EURC", "Ethereum", 1000.0),
            position("morpho-blue", "EURC", "Base", 2000.0),
        ];
        let quotes = vec![
            YieldQuote::new("aave-v3", "EURC", "EURC", "ethereum", 5.0, 1e7),
            YieldQuote::new("morpho-blue", "EURC", "EURC", "base", 10.0, 1e7),
        ];

        let summary = aggregate(&positions, &[], &quotes);
        // 1000 * 0.05 + 2000 * 0.10
        assert_relative_eq!(summary.earnings.yearly, 250.0, epsilon = 1e-9);
        assert_relative_eq!(summary.weighted_apy, 25000.0 / 3000.0, epsilon = 1e-12);
        assert_relative_eq!(
            summary.earnings.daily,
            summary.positions.iter().map(|p| p.earnings.daily).sum::<f64>()
        );
    }

    #[test]
    fn test_estimated_fallback() {
        let positions = vec![position("curve-dex", "agEUR", "Polygon", 800.0)];
        let quotes = vec![YieldQuote::new("aave-v3", "EURC", "EURC", "polygon", 4.0, 1e7)];

        let summary = aggregate(&positions, &[], &quotes);
        let p = &summary.positions[0];
        assert_eq!(p.apy, DEFAULT_ESTIMATED_APY);
        assert_eq!(p.yield_source, YieldSourceTag::Estimated);
        assert_eq!(p.yield_source.as_str(), "estimated");
    }

    #[test]
    fn test_matched_apy_is_exact() {
        let positions = vec![position("aave-v3", "EURC", "Ethereum", 5000.0)];
        let quotes = vec![YieldQuote::new("Aave V3", "EURC", "EURC", "ethereum", 4.25, 45_000_000.0)];

        let summary = aggregate(&positions, &[], &quotes);
        assert_eq!(summary.positions[0].apy, 4.25);
        assert_eq!(summary.positions[0].yield_source, YieldSourceTag::Matched);
    }

    #[test]
    fn test_total_value_partition() {
        let positions = vec![position("aave-v3", "EURC", "Ethereum", 1234.56)];
        let balances = vec![idle("EURC", 100.25), idle("EURS", 0.75)];

        let summary = aggregate(&positions, &balances, &[]);
        assert_eq!(summary.total_value, summary.total_position_value + summary.total_raw_value);
        assert_eq!(summary.idle_capital, summary.total_raw_value);
        assert_relative_eq!(summary.total_raw_value, 101.0);
    }

    #[test]
    fn test_potential_gain_uses_portfolio_rate() {
        let positions = vec![position("aave-v3", "EURC", "Ethereum", 1000.0)];
        let quotes = vec![YieldQuote::new("aave-v3", "EURC", "EURC", "ethereum", 7.3, 1e7)];
        let balances = vec![idle("EURC", 3650.0)];

        let summary = aggregate(&positions, &balances, &quotes);
        assert_relative_eq!(summary.potential_daily_gain, 3650.0 * 7.3 / 100.0 / 365.0);
    }

    #[test]
    fn test_potential_gain_falls_back_without_positions() {
        let balances = vec![idle("EURC", 3650.0)];
        let summary = aggregate(&[], &balances, &[]);
        assert_relative_eq!(summary.potential_daily_gain, 3650.0 * 3.5 / 100.0 / 365.0);
        assert_eq!(summary.earnings.yearly, 0.0);
    }

    #[test]
    fn test_status_flags() {
        let positions = SourceSnapshot::<Vec<DetectedPosition>>::ready(vec![]);
        let balances = SourceSnapshot::<Vec<TokenBalance>>::failed("rpc down");
        let yields = SourceSnapshot::<Vec<YieldQuote>>::loading();

        let summary = summarize(&positions, &balances, &yields);
        assert!(summary.is_loading);
        // balance failures are not surfaced
        assert!(!summary.has_error);

        let positions = SourceSnapshot::<Vec<DetectedPosition>>::failed("rpc down");
        let yields = SourceSnapshot::ready(vec![]);
        let summary = summarize(&positions, &SourceSnapshot::ready(vec![]), &yields);
        assert!(!summary.is_loading);
        assert!(summary.has_error);
        assert_eq!(summary.total_value, 0.0);
    }

    #[test]
    fn test_yield_source_serializes_lowercase() {
        let json = serde_json::to_string(&YieldSourceTag::Matched).unwrap();
        assert_eq!(json, "\"matched\"");
    }
}
