//! Choosing a visibility level that fits a pixel budget.
//!
//! Starting at the track's configured level, each level is laid out and
//! measured; if it does not fit it is demoted one step
//! (Full → Pack → Squish → Dense). Dense always ends the search, so at
//! most three demotions happen.
//!
//! A level fits when:
//! - Full: the items fit one per row inside the budget and there are no
//!   more than `max_items_in_full` of them;
//! - Pack / Squish: a packing pass capped at `budget / row_height` rows
//!   (one more when folding overflow) placed every item;
//! - Dense: always.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::LayoutResult;
use crate::overflow::{OverflowMode, OverflowSummary};
use crate::space_saver;
use crate::track::TrackCapabilities;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// One track's layout request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    pub window: Window,
    /// Pixel height available to the track's rows
    pub budget: u32,
    /// Level to start from
    pub level: Visibility,
    pub capabilities: TrackCapabilities,
}

impl LayoutRequest {
    pub fn new(window: Window, budget: u32, level: Visibility) -> Self {
        Self {
            window,
            budget,
            level,
            capabilities: TrackCapabilities::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: TrackCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// A level that was tried while resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub level: Visibility,
    pub row_count: u32,
    pub height: u32,
    pub fits: bool,
    pub overflow: OverflowMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub level: Visibility,
    pub row_height: u32,
    pub layout: LayoutResult,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    fn hidden() -> Self {
        Self {
            level: Visibility::Hide,
            row_height: 0,
            layout: LayoutResult::empty(),
            attempts: Vec::new(),
        }
    }

    pub fn row_count(&self) -> u32 {
        self.layout.row_count
    }

    pub fn height(&self) -> u32 {
        self.layout.height(self.row_height)
    }

    /// Dense is accepted even when it is taller than the budget
    pub fn fits(&self, budget: u32) -> bool {
        self.height() <= budget
    }

    pub fn demotions(&self) -> usize {
        self.attempts.len().saturating_sub(1)
    }

    pub fn overflow_summary(&self) -> Option<OverflowSummary> {
        self.layout.overflow_summary()
    }
}

pub struct VisibilityResolver<'a> {
    config: &'a LayoutConfig,
}

impl<'a> VisibilityResolver<'a> {
    /// Validates `config` up front so no pass can fail halfway.
    pub fn new(config: &'a LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub fn resolve<T: LayoutItem>(&self, items: &[T], request: &LayoutRequest) -> Result<Resolution> {
        if request.level == Visibility::Hide {
            return Ok(Resolution::hidden());
        }
        if request.capabilities.self_mapped {
            return Ok(self.resolve_self_mapped(items.len(), request));
        }

        let mut level = request.level;
        let mut attempts = Vec::new();
        loop {
            let (layout, mode) = self.lay_out(items, request, level)?;
            let row_height = self.config.row_heights.for_level(level);
            let height = layout.height(row_height);
            let fits = self.fits(level, items.len(), &layout, height, request.budget);

            attempts.push(Attempt {
                level,
                row_count: layout.row_count,
                height,
                fits,
                overflow: mode,
            });

            match level.demote() {
                Some(next) if !fits => {
                    log::debug!(
                        "{} rows at {} ({} px) exceed {} px budget, demoting to {}",
                        layout.row_count,
                        level,
                        height,
                        request.budget,
                        next
                    );
                    level = next;
                }
                _ => {
                    log::debug!(
                        "resolved {} items to {} with {} rows ({} px)",
                        items.len(),
                        level,
                        layout.row_count,
                        height
                    );
                    return Ok(Resolution {
                        level,
                        row_height,
                        layout,
                        attempts,
                    });
                }
            }
        }
    }

    fn lay_out<T: LayoutItem>(
        &self,
        items: &[T],
        request: &LayoutRequest,
        level: Visibility,
    ) -> Result<(LayoutResult, OverflowMode)> {
        match level {
            Visibility::Full => Ok((LayoutResult::one_per_item(items.len()), OverflowMode::Reject)),
            Visibility::Pack | Visibility::Squish => {
                let row_height = self.config.row_heights.for_level(level);
                let rows_in_budget = request.budget / row_height;
                // the overflow row only rides on top of at least one real row
                let mode = if rows_in_budget == 0 {
                    OverflowMode::Reject
                } else {
                    OverflowMode::select(
                        self.config.overflow_enabled || request.capabilities.allow_overflow,
                        items.len(),
                        self.config.overflow_item_ceiling,
                    )
                };
                let max_rows = mode.rows_for_budget(rows_in_budget);
                let reserve_labels = level == Visibility::Pack
                    && self.config.label_reservation
                    && request.capabilities.reserve_labels;
                let layout = space_saver::pack(items, request.window, self.config, max_rows, mode, reserve_labels)?;
                Ok((layout, mode))
            }
            Visibility::Dense | Visibility::Hide => Ok((LayoutResult::single_row(items.len()), OverflowMode::Reject)),
        }
    }

    fn fits(&self, level: Visibility, item_count: usize, layout: &LayoutResult, height: u32, budget: u32) -> bool {
        match level {
            Visibility::Full => item_count <= self.config.max_items_in_full as usize && height <= budget,
            Visibility::Pack | Visibility::Squish => layout.is_complete(),
            Visibility::Dense | Visibility::Hide => true,
        }
    }

    fn resolve_self_mapped(&self, item_count: usize, request: &LayoutRequest) -> Resolution {
        let level = if request.level == Visibility::Full && item_count > self.config.max_items_in_full as usize {
            Visibility::Pack
        } else {
            request.level
        };
        let row_height = self.config.row_heights.for_level(level);
        let layout = LayoutResult::single_row(item_count);
        let attempt = Attempt {
            level,
            row_count: layout.row_count,
            height: layout.height(row_height),
            fits: true,
            overflow: OverflowMode::Reject,
        };
        Resolution {
            level,
            row_height,
            layout,
            attempts: vec![attempt],
        }
    }
}

/// Resolve with a throwaway resolver
pub fn resolve<T: LayoutItem>(items: &[T], request: &LayoutRequest, config: &LayoutConfig) -> Result<Resolution> {
    VisibilityResolver::new(config)?.resolve(items, request)
}
