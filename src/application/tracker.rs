//! Portfolio Tracker
//!
//! Fetches the three sources (protocol positions, idle wallet balances,
//! yield quotes) concurrently, keeps their latest snapshots, and derives the
//! portfolio summary from them. `run` repeats the refresh on a fixed interval
//! until `stop` is called.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Notify, RwLock};

use crate::domain::{
    all_protocol_positions, detect_idle_balances, detect_positions, is_evm_address,
    position_queries, summarize, token_queries, DetectedPosition, PortfolioSummary,
    ProtocolPosition, SourceSnapshot, TokenBalance, YieldQuote, EURO_TOKENS,
};
use crate::ports::balance::BalanceSource;
use crate::ports::yields::YieldSource;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Default)]
struct TrackerState {
    positions: SourceSnapshot<Vec<DetectedPosition>>,
    balances: SourceSnapshot<Vec<TokenBalance>>,
    yields: SourceSnapshot<Vec<YieldQuote>>,
    last_refresh: Option<DateTime<Utc>>,
    refresh_count: u64,
}

/// Status snapshot of the tracker
#[derive(Debug, Clone)]
pub struct TrackerStatus {
    pub is_running: bool,
    pub owner: String,
    pub refresh_count: u64,
    pub last_refresh: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct PortfolioTracker {
    balances: Arc<dyn BalanceSource>,
    yields: Arc<dyn YieldSource>,
    owner: String,
    positions: Arc<Vec<ProtocolPosition>>,
    state: Arc<RwLock<TrackerState>>,
    is_running: Arc<RwLock<bool>>,
    shutdown: Arc<Notify>,
    poll_interval: Duration,
}

impl PortfolioTracker {
    pub fn new(
        balances: Arc<dyn BalanceSource>,
        yields: Arc<dyn YieldSource>,
        owner: &str,
    ) -> Result<Self, TrackerError> {
        if !is_evm_address(owner) {
            return Err(TrackerError::InvalidAddress(owner.to_string()));
        }

        Ok(Self {
            balances,
            yields,
            owner: owner.to_string(),
            positions: Arc::new(all_protocol_positions()),
            state: Arc::new(RwLock::new(TrackerState::default())),
            is_running: Arc::new(RwLock::new(false)),
            shutdown: Arc::new(Notify::new()),
            poll_interval: Duration::from_secs(60),
        })
    }

    /// Set custom poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Refresh all three sources and return the new summary
    ///
    /// A failing source leaves an empty, errored snapshot; the others still
    /// update.
    pub async fn refresh(&self) -> PortfolioSummary {
        {
            let mut state = self.state.write().await;
            state.positions.is_loading = true;
            state.balances.is_loading = true;
            state.yields.is_loading = true;
        }

        let (positions, balances, yields) = tokio::join!(
            self.fetch_positions(),
            self.fetch_idle_balances(),
            self.fetch_yields(),
        );

        let mut state = self.state.write().await;
        state.positions = positions;
        state.balances = balances;
        state.yields = yields;
        state.last_refresh = Some(Utc::now());
        state.refresh_count += 1;

        let summary = summarize(&state.positions, &state.balances, &state.yields);
        tracing::info!(
            "Refresh #{}: {} positions, total {:.2}, weighted APY {:.2}%, idle {:.2}",
            state.refresh_count,
            summary.position_count,
            summary.total_value,
            summary.weighted_apy,
            summary.idle_capital
        );
        summary
    }

    /// Summary over the current snapshots, without fetching
    pub async fn summary(&self) -> PortfolioSummary {
        let state = self.state.read().await;
        summarize(&state.positions, &state.balances, &state.yields)
    }

    /// Quotes from the last refresh
    pub async fn quotes(&self) -> Vec<YieldQuote> {
        self.state.read().await.yields.data.clone()
    }

    async fn fetch_positions(&self) -> SourceSnapshot<Vec<DetectedPosition>> {
        let queries = position_queries(&self.positions);
        match self.balances.fetch_balances(&self.owner, &queries).await {
            Ok(results) => SourceSnapshot::ready(detect_positions(&self.positions, &results)),
            Err(e) => {
                tracing::warn!("Position read failed: {}", e);
                SourceSnapshot::failed(e.to_string())
            }
        }
    }

    async fn fetch_idle_balances(&self) -> SourceSnapshot<Vec<TokenBalance>> {
        let queries = token_queries(EURO_TOKENS);
        match self.balances.fetch_balances(&self.owner, &queries).await {
            Ok(results) => SourceSnapshot::ready(detect_idle_balances(EURO_TOKENS, &results)),
            Err(e) => {
                tracing::warn!("Wallet balance read failed: {}", e);
                SourceSnapshot::failed(e.to_string())
            }
        }
    }

    async fn fetch_yields(&self) -> SourceSnapshot<Vec<YieldQuote>> {
        match self.yields.fetch_yields().await {
            Ok(quotes) => SourceSnapshot::ready(quotes),
            Err(e) => {
                tracing::warn!("Yield fetch failed: {}", e);
                SourceSnapshot::failed(e.to_string())
            }
        }
    }

    /// Refresh on every poll interval until stopped
    ///
    /// A `stop` issued before `run` starts ends the loop after its first cycle.
    pub async fn run<F>(&self, mut on_refresh: F)
    where
        F: FnMut(&PortfolioSummary),
    {
        *self.is_running.write().await = true;
        tracing::info!(
            "Tracking {} every {:?}",
            self.owner,
            self.poll_interval
        );

        loop {
            let summary = self.refresh().await;
            on_refresh(&summary);

            tokio::select! {
                _ = self.shutdown.notified() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        *self.is_running.write().await = false;
        tracing::info!("Portfolio tracker stopped");
    }

    /// Stop the polling loop, interrupting its sleep
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        self.shutdown.notify_one();
        tracing::info!("Stop signal sent to tracker");
    }

    pub async fn status(&self) -> TrackerStatus {
        let state = self.state.read().await;
        let errors = [
            state.positions.error.as_ref(),
            state.balances.error.as_ref(),
            state.yields.error.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

        TrackerStatus {
            is_running: *self.is_running.read().await,
            owner: self.owner.clone(),
            refresh_count: state.refresh_count,
            last_refresh: state.last_refresh,
            errors,
        }
    }
}
