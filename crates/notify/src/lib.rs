//! Notification channel for new-observation alerts.
//!
//! This crate provides:
//! - `Notifier` trait for the outbound messaging channel
//! - Slack incoming-webhook implementation
//! - Per-family message rendering (text plus Block Kit sections)

pub mod message;
pub mod slack;
pub mod traits;

pub use slack::SlackWebhookNotifier;
pub use traits::{Notification, Notifier, NotifyError};
