//! Genomic coordinates to row cells.

use crate::error::{LayoutError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Half-open range of cells `[start, end)` within one row.
///
/// Always at least one cell wide and never past the end of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: u32,
    pub end: u32,
}

impl CellRange {
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Maps genomic coordinates inside a window to row cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    window: Window,
    cells_per_row: u32,
    scale: f64,
    pixels_per_cell: f64,
    padding: u32,
}

impl Quantizer {
    pub fn new(window: Window, cells_per_row: u32) -> Result<Self> {
        if cells_per_row == 0 {
            return Err(LayoutError::ZeroCells);
        }
        Ok(Self {
            window,
            cells_per_row,
            scale: cells_per_row as f64 / window.width() as f64,
            pixels_per_cell: 1.0,
            padding: 0,
        })
    }

    /// Pixels covered by one cell, for label reservation
    pub fn with_pixels_per_cell(mut self, pixels_per_cell: f64) -> Self {
        if pixels_per_cell.is_finite() && pixels_per_cell > 0.0 {
            self.pixels_per_cell = pixels_per_cell;
        }
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn cells_per_row(&self) -> u32 {
        self.cells_per_row
    }

    /// Cells needed by a label, rounded up
    pub fn label_cells(&self, label_pixels: u32) -> u32 {
        if label_pixels == 0 {
            return 0;
        }
        (label_pixels as f64 / self.pixels_per_cell).ceil() as u32
    }

    /// Clip a span to the window and convert it to cells.
    ///
    /// The start rounds down and the end rounds down plus one, so zero-length
    /// and inverted spans still take one cell. With `reserve_label` the range
    /// grows leftwards by the label width.
    pub fn cell_range(&self, span: Span, label_pixels: u32, reserve_label: bool) -> CellRange {
        let cells = self.cells_per_row as i64;
        let clipped_start = span.start.max(self.window.start());
        let clipped_end = span.end.min(self.window.end());

        let cell_start = self.to_cell(clipped_start).clamp(0, cells - 1);
        let mut cell_end = (self.to_cell(clipped_end) + 1).clamp(0, cells);
        if cell_end <= cell_start {
            cell_end = cell_start + 1;
        }
        cell_end = (cell_end + self.padding as i64).min(cells);

        let mut start = cell_start as u32;
        if reserve_label {
            start = start.saturating_sub(self.label_cells(label_pixels));
        }

        CellRange {
            start,
            end: cell_end as u32,
        }
    }

    /// Cell ranges for every piece of an item. The label attaches to the
    /// leftmost piece only.
    pub fn item_ranges<T: LayoutItem + ?Sized>(&self, item: &T, reserve_label: bool) -> Vec<CellRange> {
        let pieces = item.pieces();
        if pieces.is_empty() {
            let span = Span::new(item.start(), item.end());
            return vec![self.cell_range(span, item.label_pixels(), reserve_label)];
        }

        let first = pieces
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.start)
            .map(|(i, _)| i)
            .unwrap_or(0);

        pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| self.cell_range(*piece, item.label_pixels(), reserve_label && i == first))
            .collect()
    }

    fn to_cell(&self, pos: GenomicPos) -> i64 {
        let offset = pos as i128 - self.window.start() as i128;
        (offset as f64 * self.scale).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer() -> Quantizer {
        Quantizer::new(Window::new(0, 1000).unwrap(), 256).unwrap()
    }

    #[test]
    fn test_basic_range() {
        let q = quantizer();
        let range = q.cell_range(Span::new(0, 100), 0, false);
        assert_eq!(range, CellRange { start: 0, end: 26 });

        let range = q.cell_range(Span::new(400, 500), 0, false);
        assert_eq!(range, CellRange { start: 102, end: 129 });
    }

    #[test]
    fn test_clips_to_window() {
        let q = quantizer();
        let range = q.cell_range(Span::new(-500, 10_000), 0, false);
        assert_eq!(range, CellRange { start: 0, end: 256 });

        // entirely past the right edge still lands in the last cell
        let range = q.cell_range(Span::new(2000, 3000), 0, false);
        assert_eq!(range, CellRange { start: 255, end: 256 });
    }

    #[test]
    fn test_zero_length_takes_one_cell() {
        let q = quantizer();
        let range = q.cell_range(Span::new(500, 500), 0, false);
        assert_eq!(range.width(), 1);
        assert_eq!(range.start, 128);

        let range = q.cell_range(Span::new(1000, 1000), 0, false);
        assert_eq!(range, CellRange { start: 255, end: 256 });
    }

    #[test]
    fn test_inverted_span_is_normalized() {
        let q = quantizer();
        let range = q.cell_range(Span::new(600, 300), 0, false);
        assert!(range.width() >= 1);
        assert!(range.end <= 256);
    }

    #[test]
    fn test_label_reservation() {
        let q = quantizer();
        let range = q.cell_range(Span::new(400, 500), 30, true);
        assert_eq!(range.start, 102 - 30);

        // clamped at the left edge
        let range = q.cell_range(Span::new(10, 20), 30, true);
        assert_eq!(range.start, 0);

        // ignored when not reserving
        let range = q.cell_range(Span::new(400, 500), 30, false);
        assert_eq!(range.start, 102);
    }

    #[test]
    fn test_label_cells_follow_pixel_width() {
        let q = quantizer().with_pixels_per_cell(2.0);
        assert_eq!(q.label_cells(30), 15);
        assert_eq!(q.label_cells(31), 16);
        assert_eq!(q.label_cells(0), 0);
    }

    #[test]
    fn test_padding_extends_right() {
        let q = quantizer().with_padding(2);
        let range = q.cell_range(Span::new(0, 100), 0, false);
        assert_eq!(range.end, 28);

        let range = q.cell_range(Span::new(990, 1000), 0, false);
        assert_eq!(range.end, 256);
    }

    #[test]
    fn test_item_ranges_label_on_leftmost_piece() {
        let q = quantizer();
        let item = Item::new(7, 0, 0)
            .with_pieces(vec![Span::new(600, 700), Span::new(200, 300)])
            .with_label_pixels(10);
        let ranges = q.item_ranges(&item, true);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, 153);
        assert_eq!(ranges[1].start, 51 - 10);
    }

    #[test]
    fn test_extreme_window_does_not_overflow() {
        let q = Quantizer::new(Window::new(i64::MIN, i64::MAX).unwrap(), 256).unwrap();
        assert_eq!(q.cell_range(Span::new(i64::MIN, i64::MAX), 0, false), CellRange { start: 0, end: 256 });
        assert_eq!(q.cell_range(Span::new(0, 10), 0, false), CellRange { start: 128, end: 129 });
        assert_eq!(q.cell_range(Span::new(i64::MAX, i64::MIN), 0, false).width(), 1);
    }

    #[test]
    fn test_zero_cells_is_an_error() {
        let window = Window::new(0, 10).unwrap();
        assert_eq!(Quantizer::new(window, 0), Err(LayoutError::ZeroCells));
    }
}
