use async_trait::async_trait;
use thiserror::Error;

use crate::domain::YieldQuote;

#[derive(Debug, Error)]
pub enum YieldError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Third-party yield aggregator, already filtered to Euro pools
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait YieldSource: Send + Sync {
    async fn fetch_yields(&self) -> Result<Vec<YieldQuote>, YieldError>;
}
