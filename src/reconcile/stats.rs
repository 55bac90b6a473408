//! Per-cycle reconciliation statistics.
//!
//! Collected once a cycle has merged its records; used for logging and shown
//! alongside the published view.

use super::merge::TimelineEntry;
use super::record::Category;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics about a single reconciliation cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Raw records fetched across all six collections.
    pub fetched: usize,
    /// Records excluded because they could not be classified or dated.
    pub rejected: usize,
    /// Unaudited burns dropped for belonging to another token.
    pub filtered_out: usize,
    /// Timeline entries per category.
    pub per_category: BTreeMap<Category, usize>,
    /// Unaudited burns older than the overdue threshold.
    pub overdue_burns: usize,
}

impl ReconcileStats {
    pub fn collect(
        fetched: usize,
        rejected: usize,
        filtered_out: usize,
        timeline: &[TimelineEntry],
        now: DateTime<Utc>,
        overdue_after: Duration,
    ) -> Self {
        let mut per_category = BTreeMap::new();
        let mut overdue_burns = 0;

        for entry in timeline {
            *per_category.entry(entry.category()).or_insert(0) += 1;
            if entry.is_overdue(now, overdue_after) {
                overdue_burns += 1;
            }
        }

        Self {
            fetched,
            rejected,
            filtered_out,
            per_category,
            overdue_burns,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }

    /// Get a human-readable summary of the cycle statistics
    pub fn summary(&self) -> String {
        let categories = Category::ALL
            .iter()
            .map(|c| format!("{} {}", self.count(*c), c))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} fetched, {} rejected, {} other-token burns dropped: {}{}",
            self.fetched,
            self.rejected,
            self.filtered_out,
            categories,
            if self.overdue_burns == 0 {
                String::new()
            } else {
                format!(" ({} overdue burns)", self.overdue_burns)
            }
        )
    }
}
