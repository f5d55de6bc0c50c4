use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TriggeredAlert;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No recipient for alert {0}")]
    NoRecipient(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Delivery channel for triggered alerts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &TriggeredAlert) -> Result<(), NotifyError>;
}
