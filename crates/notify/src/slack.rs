//! Slack incoming-webhook notifier.
//!
//! Posts the notification payload as JSON to a configured webhook URL.
//! Slack answers 2xx with "ok" on acceptance; anything else is a delivery
//! failure and the caller leaves the backlog row un-notified.

use crate::traits::{Notification, Notifier, NotifyError};

/// Delivers notifications to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookNotifier {
    url: String,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl SlackWebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let url = url.into();
        if url.is_empty() {
            return Err(NotifyError::Config(
                "webhook URL must not be empty".to_string(),
            ));
        }
        Ok(Self {
            url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for SlackWebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(%status, body = %body, "webhook returned non-2xx status");
            return Err(NotifyError::Rejected(format!("{status}: {body}")));
        }

        tracing::debug!(%status, "webhook notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "slack-webhook"
    }
}
