//! Drains the un-notified backlog through the messaging channel.

use chainwatch_core::Config;
use chainwatch_notify::{message, Notifier};
use chainwatch_store::{Family, LedgerStore, StoreError};

/// Result of one dispatch attempt for one backlog row.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub family: Family,
    pub key: String,
    pub success: bool,
    pub error: Option<String>,
}

/// For every family: fetch the un-notified rows oldest-first, send one
/// message per row, and flip the notified flag only after the channel
/// accepted the message. A failed send leaves its row pending and the loop
/// moves on; the next scheduled run retries the row. No intra-run retry.
pub async fn drain_backlog(
    store: &LedgerStore,
    notifier: &dyn Notifier,
    config: &Config,
) -> Result<Vec<DispatchOutcome>, StoreError> {
    let mut outcomes = Vec::new();

    for family in Family::ALL {
        let pending = store.fetch_unnotified(family).await?;
        if pending.is_empty() {
            continue;
        }
        tracing::info!(%family, backlog = pending.len(), "dispatching backlog");

        for row in pending {
            let key = row.observation.key_label();
            let notification = message::render(&row.observation, config);

            match notifier.send(&notification).await {
                Ok(()) => {
                    // Flag flip follows the send: a crash between the two
                    // re-sends this row next run (at-least-once delivery).
                    let marked = store.mark_notified(family, row.id).await;
                    if let Err(e) = &marked {
                        tracing::error!(%family, %key, error = %e, "dispatched but failed to mark notified");
                    } else {
                        tracing::info!(
                            channel = notifier.channel_name(),
                            %family,
                            %key,
                            "notification dispatched"
                        );
                    }
                    outcomes.push(DispatchOutcome {
                        family,
                        key,
                        success: true,
                        error: marked.err().map(|e| e.to_string()),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        channel = notifier.channel_name(),
                        %family,
                        %key,
                        error = %e,
                        "notification dispatch failed"
                    );
                    outcomes.push(DispatchOutcome {
                        family,
                        key,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
    }

    Ok(outcomes)
}
