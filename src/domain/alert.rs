//! Threshold alerts over yield quotes
//!
//! Rules name a protocol and chain (optionally an asset) and fire when the
//! matched quote crosses the threshold. A rule that fired inside the cooldown
//! window is skipped.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::matcher::find_yield;
use super::quote::YieldQuote;

/// Default minimum gap between two notifications for the same rule
pub const DEFAULT_COOLDOWN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    ApyAbove,
    ApyBelow,
    TvlBelow,
}

impl AlertCondition {
    fn is_met(&self, quote: &YieldQuote, threshold: f64) -> bool {
        match self {
            AlertCondition::ApyAbove => quote.apy > threshold,
            AlertCondition::ApyBelow => quote.apy < threshold,
            AlertCondition::TvlBelow => quote.tvl < threshold,
        }
    }

    fn observed(&self, quote: &YieldQuote) -> f64 {
        match self {
            AlertCondition::ApyAbove | AlertCondition::ApyBelow => quote.apy,
            AlertCondition::TvlBelow => quote.tvl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub protocol_slug: String,
    pub chain: String,
    /// Restrict to pools carrying this asset; any asset when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub condition: AlertCondition,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl AlertRule {
    pub fn in_cooldown(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        self.last_sent_at
            .map(|sent| now.signed_duration_since(sent) < cooldown)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    pub rule_id: String,
    pub email: Option<String>,
    pub condition: AlertCondition,
    pub protocol: String,
    pub pool: String,
    pub chain: String,
    pub current_value: f64,
    pub threshold: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertReport {
    pub processed: usize,
    pub triggered: Vec<TriggeredAlert>,
    pub skipped: usize,
    pub unmatched: usize,
}

/// Evaluate every rule against one quote snapshot
pub fn evaluate_alerts(
    rules: &[AlertRule],
    quotes: &[YieldQuote],
    now: DateTime<Utc>,
    cooldown: Duration,
) -> AlertReport {
    let mut report = AlertReport::default();

    for rule in rules {
        report.processed += 1;

        if rule.in_cooldown(now, cooldown) {
            report.skipped += 1;
            continue;
        }

        // Empty asset is contained in every symbol.
        let asset = rule.asset.as_deref().unwrap_or("");
        let Some(quote) = find_yield(quotes, &rule.protocol_slug, asset, &rule.chain) else {
            report.unmatched += 1;
            continue;
        };

        if rule.condition.is_met(quote, rule.threshold) {
            report.triggered.push(TriggeredAlert {
                rule_id: rule.id.clone(),
                email: rule.email.clone(),
                condition: rule.condition,
                protocol: quote.protocol.clone(),
                pool: quote.pool.clone(),
                chain: quote.chain.clone(),
                current_value: rule.condition.observed(quote),
                threshold: rule.threshold,
                message: alert_message(rule, quote),
            });
        }
    }

    report
}

fn alert_message(rule: &AlertRule, quote: &YieldQuote) -> String {
    match rule.condition {
        AlertCondition::ApyAbove => format!(
            "{} {} on {} APY is now {:.2}%, above your target of {}%",
            quote.protocol, quote.pool, quote.chain, quote.apy, rule.threshold
        ),
        AlertCondition::ApyBelow => format!(
            "{} {} on {} APY has dropped to {:.2}%, below your threshold of {}%",
            quote.protocol, quote.pool, quote.chain, quote.apy, rule.threshold
        ),
        AlertCondition::TvlBelow => format!(
            "{} {} on {} TVL is now {:.0}, below your limit of {}",
            quote.protocol, quote.pool, quote.chain, quote.tvl, rule.threshold
        ),
    }
}
