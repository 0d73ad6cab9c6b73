//! Persists collected observations, ignoring already-known keys.

use chainwatch_store::{LedgerStore, Observation};

/// Insert each observation unless its natural key is already in the ledger.
/// Returns how many rows were newly inserted.
///
/// Recording never sends anything: insertion and notification are decoupled
/// so one run can insert new observations while notifying backlog left over
/// from an earlier, partially failed run. A per-row store error is logged
/// and skipped; the key is re-observed next run.
pub async fn record_observations(store: &LedgerStore, observations: &[Observation]) -> usize {
    let mut inserted = 0;

    for observation in observations {
        match store.record_if_absent(observation).await {
            Ok(true) => {
                tracing::info!(
                    family = %observation.family(),
                    key = %observation.key_label(),
                    "recorded new observation"
                );
                inserted += 1;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    family = %observation.family(),
                    key = %observation.key_label(),
                    error = %e,
                    "failed to record observation"
                );
            }
        }
    }

    inserted
}
