//! Greedy first-fit row packing.
//!
//! Items are placed in the order they arrive, each on the first existing
//! row (in creation order) where all of its cells are free. A new row is
//! opened only when none fits and the cap allows it; past the cap the
//! [`OverflowMode`] decides. The result depends on input order and is not
//! guaranteed to use the fewest rows.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::LayoutResult;
use crate::overflow::OverflowMode;
use crate::quantize::{CellRange, Quantizer};
use crate::row::Row;
use crate::types::*;

/// Outcome of offering one item to a [`SpaceSaver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(RowIndex),
    Rejected,
}

pub struct SpaceSaver {
    quantizer: Quantizer,
    rows: Vec<Row>,
    max_rows: u32,
    mode: OverflowMode,
    reserve_labels: bool,
    overflow_row: Option<usize>,
    overflow_count: u32,
    assignments: Vec<(ItemRef, RowIndex)>,
    rejected: Option<ItemRef>,
}

impl SpaceSaver {
    pub fn new(window: Window, cells_per_row: u32, max_rows: u32) -> Result<Self> {
        Ok(Self::with_quantizer(Quantizer::new(window, cells_per_row)?, max_rows))
    }

    /// Build from a layout configuration: label scale and padding come from
    /// `config`, row cap and overflow mode from the caller.
    pub fn from_config(window: Window, config: &LayoutConfig, max_rows: u32, mode: OverflowMode) -> Result<Self> {
        let quantizer = Quantizer::new(window, config.cells_per_row)?
            .with_pixels_per_cell(config.pixels_per_cell())
            .with_padding(config.padding_cells);
        Ok(Self::with_quantizer(quantizer, max_rows).with_overflow(mode))
    }

    pub fn with_quantizer(quantizer: Quantizer, max_rows: u32) -> Self {
        Self {
            quantizer,
            rows: Vec::new(),
            max_rows,
            mode: OverflowMode::Reject,
            reserve_labels: false,
            overflow_row: None,
            overflow_count: 0,
            assignments: Vec::new(),
            rejected: None,
        }
    }

    pub fn with_overflow(mut self, mode: OverflowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_label_reservation(mut self, reserve_labels: bool) -> Self {
        self.reserve_labels = reserve_labels;
        self
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rejected(&self) -> Option<ItemRef> {
        self.rejected
    }

    /// Offer one item. `item_ref` is its index in the caller's slice.
    pub fn add<T: LayoutItem + ?Sized>(&mut self, item_ref: ItemRef, item: &T) -> Placement {
        let ranges = self.quantizer.item_ranges(item, self.reserve_labels);
        self.place(item_ref, &ranges)
    }

    /// Offer an item made of several spans that must share a row.
    pub fn add_spans(&mut self, item_ref: ItemRef, spans: &[Span], label_pixels: u32) -> Placement {
        let Some(first) = spans.iter().map(|s| s.start).min() else {
            // no spans still takes one cell, like a zero-length item
            let start = self.quantizer.window().start();
            let range = self
                .quantizer
                .cell_range(Span::new(start, start), label_pixels, self.reserve_labels);
            return self.place(item_ref, &[range]);
        };
        let ranges: Vec<CellRange> = spans
            .iter()
            .map(|span| {
                let reserve = self.reserve_labels && span.start == first;
                self.quantizer.cell_range(*span, label_pixels, reserve)
            })
            .collect();
        self.place(item_ref, &ranges)
    }

    /// Feed items in order, stopping at the first rejection. Returns the
    /// refused item, if any; later items are left out of this pass.
    pub fn add_all<T: LayoutItem>(&mut self, items: &[T]) -> Option<ItemRef> {
        for (item_ref, item) in items.iter().enumerate() {
            if self.add(item_ref, item) == Placement::Rejected {
                return Some(item_ref);
            }
        }
        None
    }

    pub fn finish(self) -> LayoutResult {
        LayoutResult {
            row_count: self.rows.len() as u32,
            assignments: self.assignments,
            overflow_row: self.overflow_row.map(|row| row as RowIndex),
            overflow_count: self.overflow_count,
            rejected: self.rejected,
        }
    }

    fn place(&mut self, item_ref: ItemRef, ranges: &[CellRange]) -> Placement {
        if let Some(row) = self.first_free_row(ranges) {
            return self.commit(item_ref, row, ranges);
        }

        let packed_rows = self.rows.len() - usize::from(self.overflow_row.is_some());
        if packed_rows < self.mode.packable_rows(self.max_rows) as usize {
            self.rows.push(Row::new(self.quantizer.cells_per_row()));
            return self.commit(item_ref, self.rows.len() - 1, ranges);
        }

        match self.mode {
            OverflowMode::Reject => {
                log::trace!("item {} rejected at {} rows", item_ref, self.rows.len());
                self.rejected.get_or_insert(item_ref);
                Placement::Rejected
            }
            OverflowMode::Fold => {
                let row = match self.overflow_row {
                    Some(row) => row,
                    None => {
                        self.rows.push(Row::overflow(self.quantizer.cells_per_row()));
                        let row = self.rows.len() - 1;
                        self.overflow_row = Some(row);
                        row
                    }
                };
                self.overflow_count += 1;
                self.commit(item_ref, row, ranges)
            }
        }
    }

    fn first_free_row(&self, ranges: &[CellRange]) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| !row.is_overflow() && ranges.iter().all(|r| row.is_range_free(*r)))
    }

    fn commit(&mut self, item_ref: ItemRef, row: usize, ranges: &[CellRange]) -> Placement {
        let target = &mut self.rows[row];
        for range in ranges {
            target.mark_range(*range);
        }
        target.push_member(item_ref);

        let row = row as RowIndex;
        self.assignments.push((item_ref, row));
        log::trace!("item {} placed on row {}", item_ref, row);
        Placement::Placed(row)
    }
}

/// Run one packing pass over `items` and freeze it.
pub fn pack<T: LayoutItem>(
    items: &[T],
    window: Window,
    config: &LayoutConfig,
    max_rows: u32,
    mode: OverflowMode,
    reserve_labels: bool,
) -> Result<LayoutResult> {
    let mut saver = SpaceSaver::from_config(window, config, max_rows, mode)?
        .with_label_reservation(reserve_labels);
    if let Some(rejected) = saver.add_all(items) {
        log::debug!(
            "packing stopped at item {} of {} ({} rows, cap {})",
            rejected,
            items.len(),
            saver.row_count(),
            max_rows
        );
    }
    Ok(saver.finish())
}
