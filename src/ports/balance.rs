use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BalanceQuery, BalanceResult};

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Invalid owner address: {0}")]
    InvalidAddress(String),

    #[error("RPC request failed: {0}")]
    RpcError(String),

    #[error("Malformed RPC response: {0}")]
    ParseError(String),
}

/// On-chain token balance reader
///
/// Returns one `BalanceResult` per query, in query order. Individual reads
/// may fail without failing the whole call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balances(
        &self,
        owner: &str,
        queries: &[BalanceQuery],
    ) -> Result<Vec<BalanceResult>, BalanceError>;
}
