//! Per-row occupancy bitmap.

use crate::quantize::CellRange;
use crate::types::ItemRef;
use bitvec::prelude::*;

/// One display row: which cells are taken and which items sit on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    occupancy: BitVec,
    members: Vec<ItemRef>,
    overflow: bool,
}

impl Row {
    pub fn new(cells_per_row: u32) -> Self {
        Self {
            occupancy: bitvec![0; cells_per_row as usize],
            members: Vec::new(),
            overflow: false,
        }
    }

    /// A row that accepts anything; its members may overlap.
    pub fn overflow(cells_per_row: u32) -> Self {
        Self {
            overflow: true,
            ..Self::new(cells_per_row)
        }
    }

    /// True iff every cell in `[start, end)` is unset. Out-of-row cells are
    /// never free.
    pub fn is_free(&self, start: u32, end: u32) -> bool {
        match self.occupancy.get(start as usize..end as usize) {
            Some(cells) => cells.not_any(),
            None => false,
        }
    }

    pub fn is_range_free(&self, range: CellRange) -> bool {
        self.is_free(range.start, range.end)
    }

    pub fn mark_occupied(&mut self, start: u32, end: u32) {
        let end = (end as usize).min(self.occupancy.len());
        let start = (start as usize).min(end);
        self.occupancy[start..end].fill(true);
    }

    pub fn mark_range(&mut self, range: CellRange) {
        self.mark_occupied(range.start, range.end);
    }

    pub(crate) fn push_member(&mut self, item: ItemRef) {
        self.members.push(item);
    }

    pub fn members(&self) -> &[ItemRef] {
        &self.members
    }

    pub fn is_overflow(&self) -> bool {
        self.overflow
    }

    pub fn occupied_cells(&self) -> usize {
        self.occupancy.count_ones()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_row_is_free() {
        let row = Row::new(256);
        assert!(row.is_free(0, 256));
        assert!(row.is_empty());
        assert!(!row.is_overflow());
    }

    #[test]
    fn test_mark_and_query() {
        let mut row = Row::new(256);
        row.mark_occupied(10, 20);
        assert!(!row.is_free(15, 16));
        assert!(!row.is_free(0, 11));
        assert!(!row.is_free(19, 30));
        assert!(row.is_free(0, 10));
        assert!(row.is_free(20, 256));
        assert_eq!(row.occupied_cells(), 10);
    }

    #[test]
    fn test_out_of_bounds_is_not_free() {
        let row = Row::new(16);
        assert!(!row.is_free(10, 17));
    }

    #[test]
    fn test_mark_clamps_to_row() {
        let mut row = Row::new(16);
        row.mark_occupied(12, 40);
        assert_eq!(row.occupied_cells(), 4);
    }

    #[test]
    fn test_members_in_insertion_order() {
        let mut row = Row::overflow(8);
        row.push_member(3);
        row.push_member(1);
        assert_eq!(row.members(), &[3, 1]);
        assert!(row.is_overflow());
    }
}
