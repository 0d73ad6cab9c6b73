use thiserror::Error;

/// Errors from ledger store operations.
///
/// Duplicate natural keys are not represented here: re-observing a key is
/// expected steady-state behavior and `record_if_absent` reports it through
/// its return value instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
