//! CLI Adapter
//!
//! Command-line interface for the Rendite yield tracker.
//! Uses clap derive macros for argument parsing.

mod commands;
mod output;

pub use commands::{
    AlertsCmd, CliApp, Command, MatchCmd, OutputFormat, PortfolioCmd, WatchCmd, YieldsCmd,
    DEFAULT_CONFIG_PATH,
};
pub use output::{render_alert_report, render_quotes, render_summary, render_summary_line};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
