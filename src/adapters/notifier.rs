//! Log-only alert delivery

use async_trait::async_trait;

use crate::domain::TriggeredAlert;
use crate::ports::notifier::{AlertNotifier, NotifyError};

/// Writes each alert to the tracing log instead of mailing it
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    /// Refuse alerts without a recipient, like a mail sender would
    require_recipient: bool,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requiring_recipient() -> Self {
        Self { require_recipient: true }
    }
}

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, alert: &TriggeredAlert) -> Result<(), NotifyError> {
        let recipient = match (&alert.email, self.require_recipient) {
            (Some(email), _) => email.as_str(),
            (None, true) => return Err(NotifyError::NoRecipient(alert.rule_id.clone())),
            (None, false) => "-",
        };

        tracing::info!(
            rule = %alert.rule_id,
            to = recipient,
            protocol = %alert.protocol,
            chain = %alert.chain,
            "ALERT: {}",
            alert.message
        );
        Ok(())
    }
}
