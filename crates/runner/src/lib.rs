//! Run orchestration: collect all signals, persist new observations, drain
//! the notification backlog, and account for what happened.

pub mod dispatch;
pub mod recorder;
pub mod run;
pub mod summary;

pub use dispatch::DispatchOutcome;
pub use run::run_cycle;
pub use summary::RunSummary;
