//! Per-item collection outcomes.
//!
//! Collectors never let one item's failure escape past that item; instead
//! every item produces an explicit outcome that travels up to the run
//! summary, so behavior is testable without scraping logs.

use chainwatch_store::Observation;

/// Outcome of processing one configured item (a cluster, a repository, or a
/// (program, cluster) pair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// Item produced this many observations (possibly zero).
    Collected(usize),
    /// Item intentionally produced nothing; the reason is steady-state, not
    /// an error.
    Skipped(String),
    /// The item's query failed; remaining items were unaffected.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub item: String,
    pub status: ItemStatus,
}

impl ItemReport {
    pub fn collected(item: impl Into<String>, count: usize) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Collected(count),
        }
    }

    pub fn skipped(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Skipped(reason.into()),
        }
    }

    pub fn failed(item: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            item: item.into(),
            status: ItemStatus::Failed(error.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ItemStatus::Failed(_))
    }
}

/// What one collector hands back: the observations to persist plus the
/// per-item outcomes behind them.
#[derive(Debug, Default)]
pub struct CollectOutput {
    pub observations: Vec<Observation>,
    pub reports: Vec<ItemReport>,
}

impl CollectOutput {
    pub fn merge(&mut self, other: CollectOutput) {
        self.observations.extend(other.observations);
        self.reports.extend(other.reports);
    }
}
