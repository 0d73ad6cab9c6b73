//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel rejected message: {0}")]
    Rejected(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A rendered notification ready for delivery.
///
/// Serializes directly into the webhook payload shape: a plain-text
/// fallback plus an optional rich `blocks` array.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<serde_json::Value>,
}

impl Notification {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: None,
        }
    }

    pub fn with_blocks(text: impl Into<String>, blocks: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            blocks: Some(blocks),
        }
    }
}

/// Trait for the outbound messaging channel.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel. Success means the
    /// channel accepted the message; no delivery confirmation beyond that
    /// is assumed.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "slack-webhook").
    fn channel_name(&self) -> &str;
}
