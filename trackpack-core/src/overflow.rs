//! What happens to items once every row is taken.
//!
//! In [`OverflowMode::Reject`] the space saver refuses the item. In
//! [`OverflowMode::Fold`] the last row of the cap is set aside as an
//! overflow row that takes every item that did not fit above it; members
//! of that row may overlap and are drawn as a summary.

use crate::types::RowIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowMode {
    #[default]
    Reject,
    Fold,
}

impl OverflowMode {
    /// Pick the mode for one layout attempt. Folding is skipped for very
    /// large item counts to bound the cost of the pass.
    pub fn select(overflow_enabled: bool, item_count: usize, item_ceiling: u32) -> Self {
        if overflow_enabled && item_count < item_ceiling as usize {
            OverflowMode::Fold
        } else {
            OverflowMode::Reject
        }
    }

    /// Rows available to conflict-free first-fit packing under a cap.
    pub fn packable_rows(self, max_rows: u32) -> u32 {
        match self {
            OverflowMode::Reject => max_rows,
            OverflowMode::Fold => effective_cap(self, max_rows) - 1,
        }
    }

    /// Rows to request from the space saver given how many fit the budget;
    /// folding reserves one extra row for the overflow.
    pub fn rows_for_budget(self, rows_in_budget: u32) -> u32 {
        match self {
            OverflowMode::Reject => rows_in_budget,
            OverflowMode::Fold => rows_in_budget.saturating_add(1),
        }
    }
}

/// A fold cap of zero still leaves the overflow row.
pub(crate) fn effective_cap(mode: OverflowMode, max_rows: u32) -> u32 {
    match mode {
        OverflowMode::Reject => max_rows,
        OverflowMode::Fold => max_rows.max(1),
    }
}

/// The overflow row as handed to a renderer: one synthetic entry plus a
/// count for its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowSummary {
    pub row: RowIndex,
    pub count: u32,
}

impl OverflowSummary {
    pub fn label(&self) -> String {
        format!("Last Row: {}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_respects_ceiling() {
        assert_eq!(OverflowMode::select(true, 10, 10_000), OverflowMode::Fold);
        assert_eq!(OverflowMode::select(true, 10_000, 10_000), OverflowMode::Reject);
        assert_eq!(OverflowMode::select(false, 10, 10_000), OverflowMode::Reject);
    }

    #[test]
    fn test_fold_reserves_last_row() {
        assert_eq!(OverflowMode::Fold.packable_rows(2), 1);
        assert_eq!(OverflowMode::Reject.packable_rows(2), 2);
    }

    #[test]
    fn test_fold_with_zero_cap() {
        assert_eq!(OverflowMode::Fold.packable_rows(0), 0);
        assert_eq!(OverflowMode::Fold.rows_for_budget(0), 1);
    }

    #[test]
    fn test_rows_for_budget() {
        assert_eq!(OverflowMode::Reject.rows_for_budget(4), 4);
        assert_eq!(OverflowMode::Fold.rows_for_budget(4), 5);
    }

    #[test]
    fn test_summary_label() {
        let summary = OverflowSummary { row: 3, count: 12 };
        assert_eq!(summary.label(), "Last Row: 12");
    }
}
