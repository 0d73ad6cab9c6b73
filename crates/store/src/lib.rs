//! Durable observation ledger backed by SQLite.
//!
//! This crate provides:
//! - `Observation`, one observed value in one of the three record families
//! - `LedgerStore` with idempotent insert, un-notified scan, and the
//!   notified flag flip
//!
//! The ledger is append-only plus a single monotone flag: rows are never
//! deleted, and `notified` flips 0→1 exactly once per row.

pub mod error;
pub mod ledger;
pub mod observation;

pub use error::StoreError;
pub use ledger::LedgerStore;
pub use observation::{Family, Observation, PendingNotification};
