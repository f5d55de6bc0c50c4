//! Configuration Module
//!
//! Loads and validates configuration and alert rules from TOML files.

pub mod loader;
pub mod rules;

pub use loader::{
    expand_path, load_config, AlertsSection, Config, ConfigError, PortfolioSection, RpcSection,
    WalletSection, YieldsSection,
};
pub use rules::{load_alert_rules, save_alert_rules};
