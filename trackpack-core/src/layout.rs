//! Row assignments handed to renderers.

use crate::overflow::OverflowSummary;
use crate::types::{ItemRef, RowIndex};
use serde::{Deserialize, Serialize};

/// Frozen row assignment for one layout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub row_count: u32,
    /// `(item, row)` in the order items were placed
    pub assignments: Vec<(ItemRef, RowIndex)>,
    pub overflow_row: Option<RowIndex>,
    pub overflow_count: u32,
    /// First item the pass refused; nothing after it was fed
    pub rejected: Option<ItemRef>,
}

impl LayoutResult {
    /// No rows at all, as for a hidden track
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every item on row 0. Always one row, even with no items.
    pub fn single_row(item_count: usize) -> Self {
        Self {
            row_count: 1,
            assignments: (0..item_count).map(|i| (i, 0)).collect(),
            ..Self::default()
        }
    }

    /// Item `i` on row `i`
    pub fn one_per_item(item_count: usize) -> Self {
        Self {
            row_count: item_count as u32,
            assignments: (0..item_count).map(|i| (i, i as RowIndex)).collect(),
            ..Self::default()
        }
    }

    /// True when no item was refused
    pub fn is_complete(&self) -> bool {
        self.rejected.is_none()
    }

    pub fn placed_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn row_of(&self, item: ItemRef) -> Option<RowIndex> {
        self.assignments
            .iter()
            .find(|(placed, _)| *placed == item)
            .map(|(_, row)| *row)
    }

    /// Items grouped by row, each row in placement order
    pub fn rows(&self) -> Vec<Vec<ItemRef>> {
        let mut rows = vec![Vec::new(); self.row_count as usize];
        for &(item, row) in &self.assignments {
            if let Some(members) = rows.get_mut(row as usize) {
                members.push(item);
            }
        }
        rows
    }

    pub fn height(&self, row_height: u32) -> u32 {
        self.row_count.saturating_mul(row_height)
    }

    /// Top pixel of a row
    pub fn y_offset(row: RowIndex, row_top: u32, row_height: u32) -> u32 {
        row_top.saturating_add(row.saturating_mul(row_height))
    }

    pub fn overflow_summary(&self) -> Option<OverflowSummary> {
        self.overflow_row.map(|row| OverflowSummary {
            row,
            count: self.overflow_count,
        })
    }

    pub fn overflow_label(&self) -> Option<String> {
        self.overflow_summary().map(|s| s.label())
    }
}
