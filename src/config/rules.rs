//! Alert rule files
//!
//! Rules live in their own TOML file as an `[[alerts]]` array so that
//! `last_sent_at` can be written back after a run without touching the main
//! configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::loader::{expand_path, ConfigError};
use crate::domain::AlertRule;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RulesFile {
    #[serde(default)]
    alerts: Vec<AlertRule>,
}

/// Load alert rules from a TOML file
pub fn load_alert_rules<P: AsRef<Path>>(path: P) -> Result<Vec<AlertRule>, ConfigError> {
    let content = std::fs::read_to_string(expand_path(path))?;
    let file: RulesFile = toml::from_str(&content)?;
    validate_rules(&file.alerts)?;
    Ok(file.alerts)
}

/// Write rules back, e.g. after `last_sent_at` was updated
pub fn save_alert_rules<P: AsRef<Path>>(path: P, rules: &[AlertRule]) -> Result<(), ConfigError> {
    let file = RulesFile { alerts: rules.to_vec() };
    let content = toml::to_string_pretty(&file)?;
    std::fs::write(expand_path(path), content)?;
    Ok(())
}

fn validate_rules(rules: &[AlertRule]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    for rule in rules {
        if rule.id.is_empty() {
            return Err(ConfigError::ValidationError("alert id cannot be empty".to_string()));
        }
        if !ids.insert(rule.id.as_str()) {
            return Err(ConfigError::ValidationError(format!("duplicate alert id: {}", rule.id)));
        }
        if rule.protocol_slug.is_empty() || rule.chain.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "alert {} needs protocol_slug and chain",
                rule.id
            )));
        }
        if !rule.threshold.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "alert {} threshold must be finite",
                rule.id
            )));
        }
    }
    Ok(())
}
