//! Layout configuration
//!
//! Everything the engine needs is passed explicitly through
//! [`LayoutConfig`]; there is no process-wide state.

use crate::error::{LayoutError, Result};
use crate::types::Visibility;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CELLS_PER_ROW: u32 = 256;
pub const DEFAULT_OVERFLOW_CEILING: u32 = 10_000;
pub const DEFAULT_MAX_ITEMS_IN_FULL: u32 = 250;
pub const DEFAULT_LINE_HEIGHT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal resolution of the occupancy bitmaps
    #[serde(default = "default_cells_per_row")]
    pub cells_per_row: u32,

    /// Pixel width of the track area, used to convert label pixels to cells.
    /// Defaults to one pixel per cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_width: Option<u32>,

    /// Fold items past the row cap into an overflow row
    #[serde(default)]
    pub overflow_enabled: bool,

    /// Overflow packing is only attempted below this item count
    #[serde(default = "default_overflow_ceiling")]
    pub overflow_item_ceiling: u32,

    /// Reserve room for left-hand labels in pack mode
    #[serde(default = "default_true")]
    pub label_reservation: bool,

    /// Empty cells kept to the right of every feature
    #[serde(default)]
    pub padding_cells: u32,

    /// Full mode is refused above this many items
    #[serde(default = "default_max_items_in_full")]
    pub max_items_in_full: u32,

    /// Pixels per row at each visibility level
    #[serde(default)]
    pub row_heights: RowHeights,
}

/// Row height in pixels for each level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowHeights {
    pub full: u32,
    pub pack: u32,
    pub squish: u32,
    pub dense: u32,
}

fn default_cells_per_row() -> u32 { DEFAULT_CELLS_PER_ROW }
fn default_overflow_ceiling() -> u32 { DEFAULT_OVERFLOW_CEILING }
fn default_max_items_in_full() -> u32 { DEFAULT_MAX_ITEMS_IN_FULL }
fn default_true() -> bool { true }

impl RowHeights {
    /// Derive all levels from one line height. Squish is half the line,
    /// forced odd so features center on a pixel.
    pub fn from_line_height(line_height: u32) -> Self {
        let line_height = line_height.max(1);
        let mut squish = (line_height / 2).max(1);
        if squish % 2 == 0 {
            squish -= 1;
        }
        Self {
            full: line_height,
            pack: line_height,
            squish,
            dense: line_height,
        }
    }

    /// Height of one row at `level`; 0 for Hide.
    pub fn for_level(&self, level: Visibility) -> u32 {
        match level {
            Visibility::Full => self.full,
            Visibility::Pack => self.pack,
            Visibility::Squish => self.squish,
            Visibility::Dense => self.dense,
            Visibility::Hide => 0,
        }
    }
}

impl Default for RowHeights {
    fn default() -> Self {
        Self::from_line_height(DEFAULT_LINE_HEIGHT)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cells_per_row: default_cells_per_row(),
            pixel_width: None,
            overflow_enabled: false,
            overflow_item_ceiling: default_overflow_ceiling(),
            label_reservation: true,
            padding_cells: 0,
            max_items_in_full: default_max_items_in_full(),
            row_heights: RowHeights::default(),
        }
    }
}

impl LayoutConfig {
    pub fn with_cells_per_row(mut self, cells_per_row: u32) -> Self {
        self.cells_per_row = cells_per_row;
        self
    }

    pub fn with_row_heights(mut self, row_heights: RowHeights) -> Self {
        self.row_heights = row_heights;
        self
    }

    pub fn with_overflow(mut self, enabled: bool) -> Self {
        self.overflow_enabled = enabled;
        self
    }

    /// Fail fast on settings no layout can run with
    pub fn validate(&self) -> Result<()> {
        if self.cells_per_row == 0 {
            return Err(LayoutError::ZeroCells);
        }
        for level in Visibility::LEVELS {
            if self.row_heights.for_level(level) == 0 {
                return Err(LayoutError::zero_row_height(level));
            }
        }
        Ok(())
    }

    /// Pixels represented by one cell
    pub fn pixels_per_cell(&self) -> f64 {
        let pixel_width = self.pixel_width.unwrap_or(self.cells_per_row).max(1);
        pixel_width as f64 / self.cells_per_row.max(1) as f64
    }
}
