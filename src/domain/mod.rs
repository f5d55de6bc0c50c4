//! Domain Layer - Position matching and portfolio aggregation
//!
//! Pure types and functions, no I/O. Balances and quotes arrive through the
//! ports layer; everything here is recomputed from scratch per refresh.
//!
//! - `chain`: supported networks and address checks
//! - `registry`: static receipt-token and stablecoin tables
//! - `normalize`: protocol/chain comparison keys
//! - `matcher`: position to yield-quote join
//! - `detection`: raw balances to positions and idle holdings
//! - `portfolio`: summary metrics (weighted APY, earnings, idle capital)
//! - `alert`: threshold alerts with cooldown

pub mod chain;
pub mod registry;
pub mod normalize;
pub mod quote;
pub mod matcher;
pub mod detection;
pub mod portfolio;
pub mod alert;

pub use chain::{is_evm_address, Chain};
pub use registry::{all_protocol_positions, EuroToken, ProtocolPosition, EURO_TOKENS};
pub use normalize::{normalize_chain, normalize_protocol};
pub use quote::{risk_tags, YieldQuote};
pub use matcher::{find_yield, get_pool_apy, match_position_to_yield, YieldMatcher};
pub use detection::{
    detect_idle_balances, detect_positions, position_queries, scale_balance, token_queries,
    BalanceQuery, BalanceResult, DetectedPosition, TokenBalance, DUST_THRESHOLD,
};
pub use portfolio::{
    aggregate, summarize, Earnings, EnrichedPosition, PortfolioSummary, SourceSnapshot,
    YieldSourceTag, DEFAULT_ESTIMATED_APY,
};
pub use alert::{evaluate_alerts, AlertCondition, AlertReport, AlertRule, TriggeredAlert};
