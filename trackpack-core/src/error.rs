//! Error handling for the layout engine

use crate::types::Visibility;
use thiserror::Error;

/// Configuration errors reported before any item is laid out.
///
/// Placement failures are not errors: a full row set yields
/// [`Placement::Rejected`](crate::space_saver::Placement::Rejected).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid window: end {end} must be greater than start {start}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("Invalid configuration: cells per row must be at least 1")]
    ZeroCells,

    #[error("Invalid configuration: row height for {level} must be at least 1 pixel")]
    ZeroRowHeight { level: Visibility },
}

impl LayoutError {
    pub fn invalid_window(start: i64, end: i64) -> Self {
        Self::InvalidWindow { start, end }
    }

    pub fn zero_row_height(level: Visibility) -> Self {
        Self::ZeroRowHeight { level }
    }
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
