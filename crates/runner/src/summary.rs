//! End-of-run accounting.

use chainwatch_collect::{ItemReport, ItemStatus};

use crate::dispatch::DispatchOutcome;

/// What one run did: collection outcomes per configured item, ledger
/// insertions, and dispatch outcomes per backlog row. Per-item failures
/// live here instead of only in the log stream, so tests assert on them
/// directly.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Observations returned by the collectors (before deduplication).
    pub observed: usize,
    /// Rows newly inserted into the ledger this run.
    pub inserted: usize,
    /// Per-item collection outcomes across all three collectors.
    pub reports: Vec<ItemReport>,
    /// Per-row dispatch outcomes.
    pub dispatches: Vec<DispatchOutcome>,
}

impl RunSummary {
    pub fn failed_items(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failed()).count()
    }

    pub fn skipped_items(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, ItemStatus::Skipped(_)))
            .count()
    }

    pub fn dispatched(&self) -> usize {
        self.dispatches.iter().filter(|d| d.success).count()
    }

    pub fn dispatch_failures(&self) -> usize {
        self.dispatches.iter().filter(|d| !d.success).count()
    }

    pub fn log(&self) {
        tracing::info!(
            observed = self.observed,
            inserted = self.inserted,
            items_failed = self.failed_items(),
            items_skipped = self.skipped_items(),
            dispatched = self.dispatched(),
            dispatch_failures = self.dispatch_failures(),
            "run summary"
        );
        for report in self.reports.iter().filter(|r| r.is_failed()) {
            tracing::warn!(item = %report.item, status = ?report.status, "item failed this run");
        }
    }
}
