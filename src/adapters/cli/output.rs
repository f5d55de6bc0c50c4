//! Terminal rendering for summaries, quotes and alert reports

use std::fmt::Write;

use crate::application::AlertRunReport;
use crate::domain::{Chain, PortfolioSummary, YieldQuote};

/// Multi-line portfolio report
pub fn render_summary(owner: &str, summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Portfolio {}", owner);
    let _ = writeln!(out, "======================================");

    if summary.positions.is_empty() {
        let _ = writeln!(out, "  No protocol positions");
    }
    for p in &summary.positions {
        let _ = writeln!(
            out,
            "  {:<10} {:<12} {:<9} {:>14.2}  {:>5.2}% ({})  {:>10.2}/yr",
            p.position.protocol,
            p.position.pool_name,
            p.position.chain,
            p.position.balance,
            p.apy,
            p.yield_source.as_str(),
            p.earnings.yearly
        );
    }

    if !summary.raw_balances.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Idle in wallet:");
        for b in &summary.raw_balances {
            let chain = Chain::from_id(b.chain_id)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| format!("chain {}", b.chain_id));
            let _ = writeln!(out, "    {:<6} {:<10} {:>14.2}", b.symbol, chain, b.balance);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Total value:      {:>14.2}", summary.total_value);
    let _ = writeln!(out, "  Deployed:         {:>14.2}", summary.total_position_value);
    let _ = writeln!(out, "  Idle:             {:>14.2}", summary.idle_capital);
    let _ = writeln!(out, "  Weighted APY:     {:>13.2}%", summary.weighted_apy);
    let _ = writeln!(
        out,
        "  Earnings:         {:.2}/day  {:.2}/week  {:.2}/month  {:.2}/year",
        summary.earnings.daily, summary.earnings.weekly, summary.earnings.monthly, summary.earnings.yearly
    );
    let _ = writeln!(out, "  Idle could earn:  {:>14.4}/day", summary.potential_daily_gain);
    if summary.has_error {
        let _ = writeln!(out, "  ! position data unavailable");
    }
    out
}

/// One-line summary for watch mode
pub fn render_summary_line(summary: &PortfolioSummary) -> String {
    format!(
        "total {:.2} | {} positions | APY {:.2}% | {:.2}/day | idle {:.2}{}",
        summary.total_value,
        summary.position_count,
        summary.weighted_apy,
        summary.earnings.daily,
        summary.idle_capital,
        if summary.has_error { " | error" } else { "" }
    )
}

pub fn render_quotes(quotes: &[YieldQuote]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<22} {:<16} {:<10} {:>8} {:>16}  Tags",
        "Protocol", "Pool", "Chain", "APY", "TVL"
    );
    for q in quotes {
        let _ = writeln!(
            out,
            "{:<22} {:<16} {:<10} {:>7.2}% {:>16.0}  {}",
            q.protocol,
            q.pool,
            q.chain,
            q.apy,
            q.tvl,
            q.risk_tags.join(", ")
        );
    }
    let _ = writeln!(out, "{} pools", quotes.len());
    out
}

pub fn render_alert_report(report: &AlertRunReport) -> String {
    let mut out = String::new();
    for alert in &report.triggered {
        let _ = writeln!(out, "[{}] {}", alert.rule_id, alert.message);
    }
    let _ = writeln!(
        out,
        "{} rules: {} triggered, {} sent, {} failed, {} in cooldown, {} without a pool",
        report.processed,
        report.triggered.len(),
        report.sent,
        report.failed,
        report.skipped,
        report.unmatched
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{aggregate, DetectedPosition, TokenBalance};

    fn summary() -> PortfolioSummary {
        let position = DetectedPosition {
            id: "aave-v3-EURC-1".to_string(),
            protocol: "Aave V3".to_string(),
            protocol_slug: "aave-v3".to_string(),
            pool_name: "EURC Supply".to_string(),
            asset: "EURC".to_string(),
            chain: "Ethereum".to_string(),
            chain_id: 1,
            balance: 5000.0,
            raw_balance: 5_000_000_000,
            receipt_token: "0x018C56f6d7BD63D0E100f247b436E06a7156fF75".to_string(),
        };
        let quotes = vec![YieldQuote::new("Aave V3", "EURC", "EURC", "ethereum", 4.25, 45e6)];
        aggregate(&[position], &[], &quotes)
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary("0xabc", &summary());
        assert!(text.contains("Aave V3"));
        assert!(text.contains("4.25% (matched)"));
        assert!(text.contains("212.50/year"));
        assert!(!text.contains("unavailable"));
    }

    #[test]
    fn test_render_idle_balance_chain_name() {
        let idle = vec![
            TokenBalance {
                symbol: "EURC".to_string(),
                name: "Euro Coin".to_string(),
                token_address: "0x1aBaEA1f7C830bD89Acc67eC4af516284b1bC33c".to_string(),
                chain_id: 8453,
                balance: 250.0,
                value: 250.0,
            },
            TokenBalance {
                symbol: "EURS".to_string(),
                name: "STASIS EURO".to_string(),
                token_address: "0xdB25f211AB05b1c97D595516F45794528a807ad8".to_string(),
                chain_id: 56,
                balance: 10.0,
                value: 10.0,
            },
        ];
        let text = render_summary("0xabc", &aggregate(&[], &idle, &[]));
        assert!(text.contains("EURC   Base"));
        assert!(text.contains("chain 56"));
    }

    #[test]
    fn test_render_summary_line() {
        let line = render_summary_line(&summary());
        assert!(line.starts_with("total 5000.00 | 1 positions | APY 4.25%"));
    }

    #[test]
    fn test_render_quotes() {
        let quotes = vec![YieldQuote::new("uniswap-v3", "EURC-USDC", "EURC-USDC", "base", 12.0, 1e6)];
        let text = render_quotes(&quotes);
        assert!(text.contains("High Yield"));
        assert!(text.ends_with("1 pools\n"));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render_alert_report(&AlertRunReport::default());
        assert_eq!(text, "0 rules: 0 triggered, 0 sent, 0 failed, 0 in cooldown, 0 without a pool\n");
    }
}
