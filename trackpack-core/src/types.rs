use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type GenomicPos = i64;
/// Index of an item in the caller's slice
pub type ItemRef = usize;
pub type RowIndex = u32;

/// Genomic window being laid out, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    start: GenomicPos,
    end: GenomicPos,
}

impl Window {
    pub fn new(start: GenomicPos, end: GenomicPos) -> Result<Self> {
        if end <= start {
            return Err(LayoutError::invalid_window(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> GenomicPos {
        self.start
    }

    pub fn end(&self) -> GenomicPos {
        self.end
    }

    pub fn width(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    pub fn overlaps(&self, start: GenomicPos, end: GenomicPos) -> bool {
        // zero-length features sitting on the window count
        start < self.end && (end > self.start || (start == end && start >= self.start))
    }
}

/// Half-open genomic span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Span {
    pub fn new(start: GenomicPos, end: GenomicPos) -> Self {
        Self { start, end }
    }
}

/// Display resolution of a track.
///
/// The packing levels are ordered finest to coarsest:
/// `Full < Pack < Squish < Dense`. `Hide` sits outside that chain and is
/// never reached by demotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// One row per item, unpacked
    Full,
    /// Greedy packing at normal row height
    Pack,
    /// Greedy packing at half row height
    Squish,
    /// Every item on a single row
    Dense,
    /// Not drawn
    Hide,
}

impl Visibility {
    /// Packing levels from finest to coarsest
    pub const LEVELS: [Visibility; 4] = [
        Visibility::Full,
        Visibility::Pack,
        Visibility::Squish,
        Visibility::Dense,
    ];

    /// Next coarser level, `None` for Dense and Hide.
    pub fn demote(self) -> Option<Visibility> {
        match self {
            Visibility::Full => Some(Visibility::Pack),
            Visibility::Pack => Some(Visibility::Squish),
            Visibility::Squish => Some(Visibility::Dense),
            Visibility::Dense | Visibility::Hide => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Full => "full",
            Visibility::Pack => "pack",
            Visibility::Squish => "squish",
            Visibility::Dense => "dense",
            Visibility::Hide => "hide",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Visibility::Full),
            "pack" => Ok(Visibility::Pack),
            "squish" => Ok(Visibility::Squish),
            "dense" => Ok(Visibility::Dense),
            "hide" => Ok(Visibility::Hide),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

/// What the engine needs to know about a feature.
///
/// The engine never owns items; it records their index in the caller's
/// slice.
pub trait LayoutItem {
    fn start(&self) -> GenomicPos;

    fn end(&self) -> GenomicPos;

    /// Width of the item's left-hand label in pixels
    fn label_pixels(&self) -> u32 {
        0
    }

    /// Disjoint pieces that must share one row. Empty means the item is the
    /// single span `[start, end)`.
    fn pieces(&self) -> &[Span] {
        &[]
    }
}

/// A feature handed to the engine by a loading collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<P = ()> {
    pub id: u64,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub label_pixels: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pieces: Vec<Span>,
    pub payload: P,
}

impl Item<()> {
    pub fn new(id: u64, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            id,
            start,
            end,
            label_pixels: 0,
            pieces: Vec::new(),
            payload: (),
        }
    }
}

impl<P> Item<P> {
    pub fn with_label_pixels(mut self, label_pixels: u32) -> Self {
        self.label_pixels = label_pixels;
        self
    }

    /// Replace the single span with several pieces; the overall extent is
    /// widened to cover them.
    pub fn with_pieces(mut self, pieces: Vec<Span>) -> Self {
        if let (Some(lo), Some(hi)) = (
            pieces.iter().map(|p| p.start).min(),
            pieces.iter().map(|p| p.end).max(),
        ) {
            self.start = self.start.min(lo);
            self.end = self.end.max(hi);
        }
        self.pieces = pieces;
        self
    }

    pub fn with_payload<Q>(self, payload: Q) -> Item<Q> {
        Item {
            id: self.id,
            start: self.start,
            end: self.end,
            label_pixels: self.label_pixels,
            pieces: self.pieces,
            payload,
        }
    }
}

impl<P> LayoutItem for Item<P> {
    fn start(&self) -> GenomicPos {
        self.start
    }

    fn end(&self) -> GenomicPos {
        self.end
    }

    fn label_pixels(&self) -> u32 {
        self.label_pixels
    }

    fn pieces(&self) -> &[Span] {
        &self.pieces
    }
}

impl<T: LayoutItem + ?Sized> LayoutItem for &T {
    fn start(&self) -> GenomicPos {
        (**self).start()
    }

    fn end(&self) -> GenomicPos {
        (**self).end()
    }

    fn label_pixels(&self) -> u32 {
        (**self).label_pixels()
    }

    fn pieces(&self) -> &[Span] {
        (**self).pieces()
    }
}
