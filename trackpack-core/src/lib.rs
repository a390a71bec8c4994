//! trackpack Core Library
//!
//! Row packing for genome browser tracks: quantize features into cells,
//! pack them first-fit into rows under a cap, fold or reject what does not
//! fit, and pick the finest visibility level that fits a pixel budget.

pub mod config;
pub mod error;
pub mod image;
pub mod layout;
pub mod overflow;
pub mod quantize;
pub mod resolver;
pub mod row;
pub mod space_saver;
pub mod track;
pub mod types;

// Re-export commonly used types and functions
pub use config::{LayoutConfig, RowHeights};
pub use error::{LayoutError, Result};
pub use image::{ImagePlan, ImagePlanner, PlacedTrack, MAX_SAFE_HEIGHT};
pub use layout::LayoutResult;
pub use overflow::{OverflowMode, OverflowSummary};
pub use quantize::{CellRange, Quantizer};
pub use resolver::{resolve, Attempt, LayoutRequest, Resolution, VisibilityResolver};
pub use row::Row;
pub use space_saver::{pack, Placement, SpaceSaver};
pub use track::{TrackCapabilities, TrackRegistry};
pub use types::{GenomicPos, Item, ItemRef, LayoutItem, RowIndex, Span, Visibility, Window};

/// Version information for the trackpack core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
