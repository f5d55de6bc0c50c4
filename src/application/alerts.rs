//! Alert Runner
//!
//! Pulls fresh quotes, evaluates every rule, and hands triggered alerts to the
//! notifier. Rules whose alert was delivered get `last_sent_at` stamped so the
//! cooldown applies on the next run.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::alert::DEFAULT_COOLDOWN_HOURS;
use crate::domain::{evaluate_alerts, AlertRule, TriggeredAlert};
use crate::ports::notifier::AlertNotifier;
use crate::ports::yields::{YieldError, YieldSource};

#[derive(Debug, Error)]
pub enum AlertRunError {
    #[error("Could not load yields: {0}")]
    Yields(#[from] YieldError),
}

/// Outcome of one alert pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertRunReport {
    pub processed: usize,
    pub triggered: Vec<TriggeredAlert>,
    pub skipped: usize,
    pub unmatched: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct AlertRunner {
    yields: Arc<dyn YieldSource>,
    notifier: Arc<dyn AlertNotifier>,
    cooldown: Duration,
}

impl AlertRunner {
    pub fn new(yields: Arc<dyn YieldSource>, notifier: Arc<dyn AlertNotifier>) -> Self {
        Self {
            yields,
            notifier,
            cooldown: Duration::hours(DEFAULT_COOLDOWN_HOURS),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Evaluate and dispatch; delivered rules are stamped with `now`
    pub async fn run(
        &self,
        rules: &mut [AlertRule],
        now: DateTime<Utc>,
    ) -> Result<AlertRunReport, AlertRunError> {
        let quotes = self.yields.fetch_yields().await?;
        let evaluation = evaluate_alerts(rules, &quotes, now, self.cooldown);

        let mut report = AlertRunReport {
            processed: evaluation.processed,
            skipped: evaluation.skipped,
            unmatched: evaluation.unmatched,
            ..AlertRunReport::default()
        };

        for alert in evaluation.triggered {
            match self.notifier.notify(&alert).await {
                Ok(()) => {
                    report.sent += 1;
                    if let Some(rule) = rules.iter_mut().find(|r| r.id == alert.rule_id) {
                        rule.last_sent_at = Some(now);
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Alert {} not delivered: {}", alert.rule_id, e);
                }
            }
            report.triggered.push(alert);
        }

        tracing::info!(
            "Alerts: {} processed, {} triggered, {} sent, {} skipped",
            report.processed,
            report.triggered.len(),
            report.sent,
            report.skipped
        );
        Ok(report)
    }
}
