//! Position to yield-quote matching
//!
//! A quote matches when, simultaneously:
//! - its normalized protocol key contains the normalized input protocol key,
//! - its normalized chain key equals the normalized input chain key,
//! - its uppercased asset contains the uppercased input asset.
//!
//! The first matching quote in source order wins. There is no ranking by TVL or
//! APY, and containment means a short key like "aave" also matches any quote
//! protocol that merely contains it.

use super::normalize::{normalize_chain, normalize_protocol};
use super::quote::YieldQuote;

/// Find the first quote for a (protocol slug, asset, chain) triple
pub fn find_yield<'a>(
    quotes: &'a [YieldQuote],
    protocol_slug: &str,
    asset: &str,
    chain: &str,
) -> Option<&'a YieldQuote> {
    let protocol_key = normalize_protocol(protocol_slug);
    let chain_key = normalize_chain(chain);
    let asset_key = asset.to_uppercase();

    quotes.iter().find(|quote| {
        normalize_protocol(&quote.protocol).contains(&protocol_key)
            && normalize_chain(&quote.chain) == chain_key
            && quote.asset.to_uppercase().contains(&asset_key)
    })
}

/// Full quote for a position, cloned for callers that outlive the quote list
pub fn match_position_to_yield(
    quotes: &[YieldQuote],
    protocol_slug: &str,
    asset: &str,
    chain: &str,
) -> Option<YieldQuote> {
    find_yield(quotes, protocol_slug, asset, chain).cloned()
}

/// APY of the matching quote
pub fn get_pool_apy(quotes: &[YieldQuote], protocol_slug: &str, asset: &str, chain: &str) -> Option<f64> {
    find_yield(quotes, protocol_slug, asset, chain).map(|q| q.apy)
}

/// Matcher bound to one quote snapshot
#[derive(Debug, Clone, Copy)]
pub struct YieldMatcher<'a> {
    quotes: &'a [YieldQuote],
}

impl<'a> YieldMatcher<'a> {
    pub fn new(quotes: &'a [YieldQuote]) -> Self {
        Self { quotes }
    }

    pub fn find_yield(&self, protocol_slug: &str, asset: &str, chain: &str) -> Option<&'a YieldQuote> {
        find_yield(self.quotes, protocol_slug, asset, chain)
    }

    pub fn get_pool_apy(&self, protocol_slug: &str, asset: &str, chain: &str) -> Option<f64> {
        get_pool_apy(self.quotes, protocol_slug, asset, chain)
    }

    pub fn quotes(&self) -> &'a [YieldQuote] {
        self.quotes
    }
}
