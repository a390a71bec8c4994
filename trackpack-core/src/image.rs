//! Stacking resolved tracks into one image.
//!
//! Browsers choke on very tall images, so the planner keeps a running total
//! and hides the first track that would push it past the cap, along with
//! every track after it.

use crate::resolver::Resolution;
use crate::types::Visibility;
use serde::{Deserialize, Serialize};

/// Tallest image the planner will produce, in pixels
pub const MAX_SAFE_HEIGHT: u32 = 32_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTrack {
    pub name: String,
    /// Top pixel of the track's first row
    pub y_top: u32,
    pub height: u32,
    pub resolution: Resolution,
}

impl PlacedTrack {
    pub fn is_hidden(&self) -> bool {
        self.resolution.level == Visibility::Hide
    }

    /// Top pixel of one of this track's rows
    pub fn row_y(&self, row: u32) -> u32 {
        crate::layout::LayoutResult::y_offset(row, self.y_top, self.resolution.row_height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePlan {
    pub total_height: u32,
    pub tracks: Vec<PlacedTrack>,
    /// Number of tracks hidden by the height cap
    pub hidden_by_cap: usize,
}

#[derive(Debug)]
pub struct ImagePlanner {
    max_height: u32,
    /// Pixels between consecutive tracks, e.g. for a center label
    track_gap: u32,
    cursor: u32,
    safe: bool,
    hidden_by_cap: usize,
    tracks: Vec<PlacedTrack>,
}

impl ImagePlanner {
    pub fn new(max_height: u32) -> Self {
        Self {
            max_height,
            track_gap: 0,
            cursor: 0,
            safe: true,
            hidden_by_cap: 0,
            tracks: Vec::new(),
        }
    }

    pub fn with_track_gap(mut self, track_gap: u32) -> Self {
        self.track_gap = track_gap;
        self
    }

    /// Place the next track below the previous ones.
    pub fn place(&mut self, name: impl Into<String>, resolution: Resolution) -> &PlacedTrack {
        let name = name.into();
        let was_hidden = resolution.level == Visibility::Hide;
        let height = resolution.height();
        let needed = height + if was_hidden { 0 } else { self.track_gap };

        let resolution = if !was_hidden && (!self.safe || self.cursor.saturating_add(needed) > self.max_height) {
            if self.safe {
                log::warn!(
                    "track '{}' ({} px) would exceed the {} px image limit; hiding it and all tracks below",
                    name,
                    height,
                    self.max_height
                );
            }
            self.safe = false;
            self.hidden_by_cap += 1;
            hide(resolution)
        } else {
            resolution
        };

        let height = resolution.height();
        let y_top = self.cursor;
        if resolution.level != Visibility::Hide {
            self.cursor += height + self.track_gap;
        }

        self.tracks.push(PlacedTrack {
            name,
            y_top,
            height,
            resolution,
        });
        let last = self.tracks.len() - 1;
        &self.tracks[last]
    }

    pub fn finish(self) -> ImagePlan {
        ImagePlan {
            total_height: self.cursor,
            tracks: self.tracks,
            hidden_by_cap: self.hidden_by_cap,
        }
    }
}

impl Default for ImagePlanner {
    fn default() -> Self {
        Self::new(MAX_SAFE_HEIGHT)
    }
}

fn hide(mut resolution: Resolution) -> Resolution {
    resolution.level = Visibility::Hide;
    resolution.row_height = 0;
    resolution.layout = crate::layout::LayoutResult::empty();
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::resolver::{resolve, LayoutRequest};
    use crate::types::{Item, Window};

    fn resolved(rows: usize) -> Resolution {
        let items: Vec<Item> = (0..rows).map(|i| Item::new(i as u64, 0, 100)).collect();
        let request = LayoutRequest::new(Window::new(0, 1000).unwrap(), 10_000, Visibility::Pack);
        resolve(&items, &request, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_tracks_stack() {
        let mut planner = ImagePlanner::new(1000).with_track_gap(2);
        planner.place("genes", resolved(3));
        let second = planner.place("snps", resolved(1));
        assert_eq!(second.y_top, 32);
        assert_eq!(second.row_y(0), 32);
        let plan = planner.finish();
        assert_eq!(plan.total_height, 44);
        assert_eq!(plan.hidden_by_cap, 0);
    }

    #[test]
    fn test_cap_hides_rest() {
        let mut planner = ImagePlanner::new(45);
        planner.place("a", resolved(2));
        planner.place("b", resolved(3));
        // would fit on its own, but everything after the first casualty hides
        planner.place("c", resolved(1));
        let plan = planner.finish();
        assert!(!plan.tracks[0].is_hidden());
        assert!(plan.tracks[1].is_hidden());
        assert!(plan.tracks[2].is_hidden());
        assert_eq!(plan.hidden_by_cap, 2);
        assert_eq!(plan.total_height, 20);
    }

    #[test]
    fn test_hidden_tracks_take_no_space() {
        let config = LayoutConfig::default();
        let request = LayoutRequest::new(Window::new(0, 10).unwrap(), 100, Visibility::Hide);
        let hidden = resolve(&[Item::new(0, 0, 5)], &request, &config).unwrap();

        let mut planner = ImagePlanner::default();
        planner.place("off", hidden);
        planner.place("on", resolved(1));
        let plan = planner.finish();
        assert_eq!(plan.tracks[1].y_top, 0);
        assert_eq!(plan.hidden_by_cap, 0);
    }
}
