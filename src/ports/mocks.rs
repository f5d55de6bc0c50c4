//! In-memory port implementations
//!
//! Deterministic sources for tests and offline runs. Each records its calls.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::balance::{BalanceError, BalanceSource};
use super::notifier::{AlertNotifier, NotifyError};
use super::yields::{YieldError, YieldSource};
use crate::domain::{BalanceQuery, BalanceResult, Chain, TriggeredAlert, YieldQuote};

/// Balance source answering from a fixed (token, chain) -> raw table
///
/// Unknown tokens read as zero.
#[derive(Debug, Default, Clone)]
pub struct StaticBalanceSource {
    balances: Arc<Mutex<HashMap<(String, Chain), u128>>>,
    failing: Arc<Mutex<HashSet<(String, Chain)>>>,
    error: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticBalanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the raw balance of a token on a chain
    pub fn with_balance(self, token: &str, chain: Chain, raw: u128) -> Self {
        lock(&self.balances).insert((token.to_lowercase(), chain), raw);
        self
    }

    /// Builder method to make one read report a failure status
    pub fn with_failed_read(self, token: &str, chain: Chain) -> Self {
        lock(&self.failing).insert((token.to_lowercase(), chain));
        self
    }

    /// Builder method to fail every call outright
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    /// Owners queried so far
    pub fn get_calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl BalanceSource for StaticBalanceSource {
    async fn fetch_balances(
        &self,
        owner: &str,
        queries: &[BalanceQuery],
    ) -> Result<Vec<BalanceResult>, BalanceError> {
        lock(&self.calls).push(owner.to_string());
        if let Some(ref message) = self.error {
            return Err(BalanceError::RpcError(message.clone()));
        }

        let balances = lock(&self.balances);
        let failing = lock(&self.failing);
        Ok(queries
            .iter()
            .map(|q| {
                let key = (q.token.to_lowercase(), q.chain);
                if failing.contains(&key) {
                    BalanceResult::Failure { reason: "read failed".to_string() }
                } else {
                    BalanceResult::Success { raw: balances.get(&key).copied().unwrap_or(0) }
                }
            })
            .collect())
    }
}

/// Yield source returning a fixed quote list
#[derive(Debug, Default, Clone)]
pub struct StaticYieldSource {
    quotes: Vec<YieldQuote>,
    error: Option<String>,
    calls: Arc<Mutex<usize>>,
}

impl StaticYieldSource {
    pub fn new(quotes: Vec<YieldQuote>) -> Self {
        Self {
            quotes,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl YieldSource for StaticYieldSource {
    async fn fetch_yields(&self) -> Result<Vec<YieldQuote>, YieldError> {
        *lock(&self.calls) += 1;
        match self.error {
            Some(ref message) => Err(YieldError::HttpError(message.clone())),
            None => Ok(self.quotes.clone()),
        }
    }
}

/// Notifier that keeps every alert it is handed
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<TriggeredAlert>>>,
    rejected: HashSet<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to make delivery fail for one rule id
    pub fn rejecting(mut self, rule_id: &str) -> Self {
        self.rejected.insert(rule_id.to_string());
        self
    }

    pub fn sent(&self) -> Vec<TriggeredAlert> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, alert: &TriggeredAlert) -> Result<(), NotifyError> {
        if self.rejected.contains(&alert.rule_id) {
            return Err(NotifyError::DeliveryFailed(format!("rejected {}", alert.rule_id)));
        }
        lock(&self.sent).push(alert.clone());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_balance_source() {
        let source = StaticBalanceSource::new()
            .with_balance("0xAA", Chain::Base, 42)
            .with_failed_read("0xBB", Chain::Base);
        let queries = vec![
            BalanceQuery { token: "0xaa".to_string(), chain: Chain::Base, decimals: 6 },
            BalanceQuery { token: "0xbb".to_string(), chain: Chain::Base, decimals: 6 },
            BalanceQuery { token: "0xaa".to_string(), chain: Chain::Ethereum, decimals: 6 },
        ];

        let results = source.fetch_balances("0xowner", &queries).await.unwrap();
        assert_eq!(results[0], BalanceResult::Success { raw: 42 });
        assert!(matches!(results[1], BalanceResult::Failure { .. }));
        assert_eq!(results[2], BalanceResult::Success { raw: 0 });
        assert_eq!(source.get_calls(), vec!["0xowner".to_string()]);
    }

    #[tokio::test]
    async fn test_static_yield_source() {
        let source = StaticYieldSource::failing("down");
        assert!(source.fetch_yields().await.is_err());
        assert_eq!(source.call_count(), 1);
    }
}
