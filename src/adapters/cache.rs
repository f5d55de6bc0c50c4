//! Yield quote cache
//!
//! Wraps any `YieldSource` and serves the last good quote list until its TTL
//! runs out. Failed fetches are passed through and never cached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::YieldQuote;
use crate::ports::yields::{YieldError, YieldSource};

/// Cache entry with TTL tracking
#[derive(Debug, Clone)]
struct CacheEntry {
    quotes: Vec<YieldQuote>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

pub struct CachedYieldSource {
    inner: Arc<dyn YieldSource>,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl CachedYieldSource {
    /// Default TTL (5 minutes)
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    pub fn new(inner: Arc<dyn YieldSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Drop the cached list so the next fetch goes upstream
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }

    /// Time left before the cached list expires
    pub async fn time_remaining(&self) -> Option<Duration> {
        let entry = self.entry.lock().await;
        entry
            .as_ref()
            .and_then(|e| self.ttl.checked_sub(e.inserted_at.elapsed()))
            .filter(|d| !d.is_zero())
    }
}

#[async_trait]
impl YieldSource for CachedYieldSource {
    async fn fetch_yields(&self) -> Result<Vec<YieldQuote>, YieldError> {
        // Held across the upstream call so concurrent refreshes share one fetch.
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref().filter(|e| e.is_valid(self.ttl)) {
            tracing::debug!("Yield cache hit ({} quotes)", cached.quotes.len());
            return Ok(cached.quotes.clone());
        }

        let quotes = self.inner.fetch_yields().await?;
        *entry = Some(CacheEntry {
            quotes: quotes.clone(),
            inserted_at: Instant::now(),
        });
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::yields::MockYieldSource;

    fn quotes() -> Vec<YieldQuote> {
        vec![YieldQuote::new("aave-v3", "EURC", "EURC", "base", 3.1, 2_000_000.0)]
    }

    #[tokio::test]
    async fn test_serves_from_cache_within_ttl() {
        let mut mock = MockYieldSource::new();
        mock.expect_fetch_yields().times(1).returning(|| Ok(quotes()));

        let cache = CachedYieldSource::new(Arc::new(mock), Duration::from_secs(60));
        assert_eq!(cache.fetch_yields().await.unwrap().len(), 1);
        assert_eq!(cache.fetch_yields().await.unwrap().len(), 1);
        assert!(cache.time_remaining().await.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let mut mock = MockYieldSource::new();
        mock.expect_fetch_yields().times(2).returning(|| Ok(quotes()));

        let cache = CachedYieldSource::new(Arc::new(mock), Duration::ZERO);
        cache.fetch_yields().await.unwrap();
        cache.fetch_yields().await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mut mock = MockYieldSource::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch_yields()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(YieldError::HttpError("timeout".to_string())));
        mock.expect_fetch_yields()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(quotes()));

        let cache = CachedYieldSource::new(Arc::new(mock), Duration::from_secs(60));
        assert!(cache.fetch_yields().await.is_err());
        assert_eq!(cache.fetch_yields().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let mut mock = MockYieldSource::new();
        mock.expect_fetch_yields().times(2).returning(|| Ok(quotes()));

        let cache = CachedYieldSource::new(Arc::new(mock), Duration::from_secs(60));
        cache.fetch_yields().await.unwrap();
        cache.invalidate().await;
        cache.fetch_yields().await.unwrap();
        assert!(cache.time_remaining().await.is_some());
    }
}
