//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the Rendite yield tracker.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::output::{render_alert_report, render_quotes, render_summary, render_summary_line};
use crate::adapters::cache::CachedYieldSource;
use crate::adapters::defillama::{DefiLlamaClient, DefiLlamaConfig};
use crate::adapters::evm::EvmRpcClient;
use crate::adapters::notifier::LogNotifier;
use crate::application::{AlertRunner, PortfolioTracker};
use crate::config::{load_alert_rules, load_config, save_alert_rules, Config};
use crate::domain::{find_yield, DEFAULT_ESTIMATED_APY};
use crate::ports::yields::YieldSource;

/// Config file read when `--config` is not given; built-in defaults apply if it is absent
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Rendite - Euro stablecoin yield tracker
#[derive(Parser, Debug)]
#[command(
    name = "rendite",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Euro stablecoin yield tracker",
    long_about = "Rendite reads a wallet's Euro-stablecoin positions on Aave, Morpho and Curve \
                  across EVM chains, matches them to live DeFiLlama yields, and reports \
                  weighted APY, projected earnings and idle capital."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refresh once and print the portfolio summary
    Portfolio(PortfolioCmd),

    /// Keep refreshing the portfolio on the configured interval
    Watch(WatchCmd),

    /// List Euro-stablecoin pools from the yield source
    Yields(YieldsCmd),

    /// Look up the quote a position would be matched to
    Match(MatchCmd),

    /// Evaluate alert rules and dispatch notifications
    Alerts(AlertsCmd),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print the portfolio summary
#[derive(Parser, Debug)]
pub struct PortfolioCmd {
    /// Wallet address (falls back to RENDITE_WALLET_ADDRESS, then config)
    #[arg(value_name = "ADDRESS")]
    pub address: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Poll the portfolio
#[derive(Parser, Debug)]
pub struct WatchCmd {
    /// Wallet address (falls back to RENDITE_WALLET_ADDRESS, then config)
    #[arg(value_name = "ADDRESS")]
    pub address: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// List pools
#[derive(Parser, Debug)]
pub struct YieldsCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Match one position
#[derive(Parser, Debug)]
pub struct MatchCmd {
    /// Protocol slug (e.g., aave-v3)
    #[arg(value_name = "PROTOCOL")]
    pub protocol: String,

    /// Asset symbol (e.g., EURC)
    #[arg(value_name = "ASSET")]
    pub asset: String,

    /// Chain name (e.g., ethereum)
    #[arg(value_name = "CHAIN")]
    pub chain: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Run alert rules
#[derive(Parser, Debug)]
pub struct AlertsCmd {
    /// TOML file with [[alerts]] rules; last_sent_at is written back
    #[arg(short, long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Evaluate without updating the rules file
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    // Initialize logging based on flags
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Portfolio(cmd) => portfolio_command(cmd).await,
        Command::Watch(cmd) => watch_command(cmd).await,
        Command::Yields(cmd) => yields_command(cmd).await,
        Command::Match(cmd) => match_command(cmd).await,
        Command::Alerts(cmd) => alerts_command(cmd).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load the given config file, or the default one if it exists
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(DEFAULT_CONFIG_PATH).context("Failed to load default configuration")
        }
        None => {
            tracing::debug!("No config file, using built-in defaults");
            Ok(Config::default())
        }
    }
}

fn resolve_address(arg: Option<String>, config: &Config) -> Result<String> {
    match arg.or_else(|| config.wallet.get_address()) {
        Some(address) => Ok(address),
        None => bail!(
            "No wallet address given.\n\n\
             Pass one as an argument, set RENDITE_WALLET_ADDRESS, or add\n  \
             [wallet]\n  address = \"0x...\"\n\
             to your config file."
        ),
    }
}

fn yield_client(config: &Config) -> Result<DefiLlamaClient> {
    DefiLlamaClient::with_config(DefiLlamaConfig::from(&config.yields))
        .context("Failed to create yield client")
}

fn build_tracker(
    config: &Config,
    address: &str,
    yields: Arc<dyn YieldSource>,
) -> Result<PortfolioTracker> {
    let rpc = config.rpc.to_evm_config()?;
    if rpc.endpoints.is_empty() {
        tracing::warn!(
            "No RPC endpoints configured; set [rpc.endpoints] or RENDITE_RPC_<CHAIN> to read balances"
        );
    }
    let balances = EvmRpcClient::new(rpc).context("Failed to create RPC client")?;

    let tracker = PortfolioTracker::new(Arc::new(balances), yields, address)?
        .with_poll_interval(Duration::from_secs(config.portfolio.poll_interval_secs));
    Ok(tracker)
}

/// Handle portfolio command
async fn portfolio_command(cmd: PortfolioCmd) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref())?;
    let address = resolve_address(cmd.address, &config)?;
    let tracker = build_tracker(&config, &address, Arc::new(yield_client(&config)?))?;

    let summary = tracker.refresh().await;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", render_summary(&address, &summary)),
    }
    Ok(())
}

/// Handle watch command
async fn watch_command(cmd: WatchCmd) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref())?;
    let address = resolve_address(cmd.address, &config)?;

    let yields = CachedYieldSource::new(Arc::new(yield_client(&config)?), config.yields.cache_ttl());
    let tracker = build_tracker(&config, &address, Arc::new(yields))?;

    // Setup Ctrl+C handler
    let handle = tracker.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        handle.stop().await;
    });

    println!("Watching {} every {}s (Ctrl+C to stop)", address, config.portfolio.poll_interval_secs);
    tracker
        .run(|summary| println!("[{}] {}", Utc::now().format("%H:%M:%S"), render_summary_line(summary)))
        .await;
    Ok(())
}

/// Handle yields command
async fn yields_command(cmd: YieldsCmd) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref())?;
    let quotes = yield_client(&config)?
        .fetch_yields()
        .await
        .context("Failed to fetch yields")?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quotes)?),
        OutputFormat::Text => print!("{}", render_quotes(&quotes)),
    }
    Ok(())
}

/// Handle match command
async fn match_command(cmd: MatchCmd) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref())?;
    let quotes = yield_client(&config)?
        .fetch_yields()
        .await
        .context("Failed to fetch yields")?;

    match find_yield(&quotes, &cmd.protocol, &cmd.asset, &cmd.chain) {
        Some(quote) => {
            println!("Matched: {} {} on {}", quote.protocol, quote.pool, quote.chain);
            println!("  APY: {:.2}%", quote.apy);
            println!("  TVL: {:.0}", quote.tvl);
            if !quote.risk_tags.is_empty() {
                println!("  Tags: {}", quote.risk_tags.join(", "));
            }
        }
        None => {
            println!(
                "No pool for {} {} on {} among {} quotes",
                cmd.protocol, cmd.asset, cmd.chain, quotes.len()
            );
            println!("  APY: {:.2}% (estimated)", DEFAULT_ESTIMATED_APY);
        }
    }
    Ok(())
}

/// Handle alerts command
async fn alerts_command(cmd: AlertsCmd) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref())?;
    let mut rules = load_alert_rules(&cmd.rules)
        .with_context(|| format!("Failed to load alert rules from {}", cmd.rules.display()))?;

    let notifier = if config.alerts.require_recipient {
        LogNotifier::requiring_recipient()
    } else {
        LogNotifier::new()
    };
    let runner = AlertRunner::new(Arc::new(yield_client(&config)?), Arc::new(notifier))
        .with_cooldown(config.alerts.cooldown()?);

    let report = runner.run(&mut rules, Utc::now()).await?;
    print!("{}", render_alert_report(&report));

    if report.sent > 0 && !cmd.dry_run {
        save_alert_rules(&cmd.rules, &rules).context("Failed to update alert rules")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_app_parse_portfolio() {
        let args = vec!["rendite", "portfolio", "0x1111111111111111111111111111111111111111"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Portfolio(cmd) => {
                assert_eq!(cmd.address.as_deref(), Some("0x1111111111111111111111111111111111111111"));
                assert!(cmd.config.is_none());
                assert_eq!(cmd.format, OutputFormat::Text);
            }
            _ => panic!("Expected Portfolio command"),
        }
    }

    #[test]
    fn test_cli_app_parse_portfolio_json() {
        let args = vec!["rendite", "portfolio", "-c", "test.toml", "--format", "json"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Portfolio(cmd) => {
                assert!(cmd.address.is_none());
                assert_eq!(cmd.config, Some(PathBuf::from("test.toml")));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            _ => panic!("Expected Portfolio command"),
        }
    }

    #[test]
    fn test_cli_app_rejects_unknown_format() {
        let args = vec!["rendite", "yields", "--format", "table"];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_app_parse_watch() {
        let args = vec!["rendite", "watch", "--config", "watch.toml"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Watch(cmd) => assert_eq!(cmd.config, Some(PathBuf::from("watch.toml"))),
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_app_parse_match() {
        let args = vec!["rendite", "match", "morpho-blue", "EURC", "base"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Match(cmd) => {
                assert_eq!(cmd.protocol, "morpho-blue");
                assert_eq!(cmd.asset, "EURC");
                assert_eq!(cmd.chain, "base");
            }
            _ => panic!("Expected Match command"),
        }
    }

    #[test]
    fn test_cli_app_match_needs_three_args() {
        let args = vec!["rendite", "match", "aave-v3", "EURC"];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_app_parse_alerts() {
        let args = vec!["rendite", "alerts", "--rules", "alerts.toml", "--dry-run"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Alerts(cmd) => {
                assert_eq!(cmd.rules, PathBuf::from("alerts.toml"));
                assert!(cmd.dry_run);
            }
            _ => panic!("Expected Alerts command"),
        }
    }

    #[test]
    fn test_alerts_requires_rules() {
        assert!(CliApp::try_parse_from(vec!["rendite", "alerts"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = vec!["rendite", "yields", "--verbose", "--debug"];
        let app = CliApp::try_parse_from(args).unwrap();
        assert!(app.verbose);
        assert!(app.debug);
    }

    #[test]
    fn test_resolve_address_prefers_argument() {
        let config = Config::default();
        let address = resolve_address(Some("0xabc".to_string()), &config).unwrap();
        assert_eq!(address, "0xabc");
    }

    #[test]
    fn test_resolve_config_explicit_missing_file() {
        assert!(resolve_config(Some(Path::new("/nonexistent/rendite.toml"))).is_err());
    }
}
