#![forbid(unsafe_code)]

//! Physical panel descriptors.
//!
//! A panel is a rectangular sub-grid of physical pixels with its own wiring
//! orientation. The overall matrix may be assembled from several panels of
//! different sizes and orientations; the mapper flattens them into one
//! logical grid.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Which corner of a panel the strip enters at.
    ///
    /// The first wired pixel sits at the top-left by default; each flag
    /// moves it to the opposite edge of its axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StartCorner: u8 {
        /// First pixel is on the right edge.
        const RIGHT  = 0b01;
        /// First pixel is on the bottom edge.
        const BOTTOM = 0b10;
    }
}

/// A physical sub-grid descriptor.
///
/// Immutable once constructed from configuration; the controller holds an
/// ordered list of panels and rebuilds the logical map whenever that list
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Pixel columns in this panel.
    pub width: u16,
    /// Pixel rows in this panel.
    pub height: u16,
    /// Horizontal offset within the logical grid.
    #[serde(default)]
    pub x: u16,
    /// Vertical offset within the logical grid.
    #[serde(default)]
    pub y: u16,
    /// Wiring runs along columns instead of rows.
    #[serde(default)]
    pub vertical: bool,
    /// Every other wired line runs in the opposite direction.
    #[serde(default)]
    pub serpentine: bool,
    /// Corner the strip enters at.
    #[serde(default)]
    pub start: StartCorner,
}

impl Panel {
    /// Create a panel of the given size at the grid origin, wired
    /// row-major from the top-left.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            vertical: false,
            serpentine: false,
            start: StartCorner::empty(),
        }
    }

    /// Place the panel at an offset within the logical grid.
    #[must_use]
    pub const fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Mark the wiring as column-major.
    #[must_use]
    pub const fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Mark the wiring as serpentine.
    #[must_use]
    pub const fn serpentine(mut self) -> Self {
        self.serpentine = true;
        self
    }

    /// Set the start corner.
    #[must_use]
    pub fn starting_at(mut self, corner: StartCorner) -> Self {
        self.start = corner;
        self
    }

    /// Right edge within the logical grid (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Bottom edge within the logical grid (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Number of physical pixel cells in this panel.
    #[inline]
    pub const fn cells(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}
