#![forbid(unsafe_code)]

//! Strip controller.
//!
//! [`Strip`] is the context object owning the shared rendering state: the
//! physical pixel bus, the panel list, and the published [`LogicalMap`].
//! Segments borrow read access to the map through it; nothing else holds
//! the map.
//!
//! # Reconfiguration
//!
//! [`Strip::configure`] runs at (re)configuration time only, never during a
//! rendering pass. The new map is built completely off to the side and
//! published with a single assignment, so a reader can never observe a
//! partially built map; `&mut self` is the exclusive section. If the host
//! issues configuration changes from another execution context, that
//! context must synchronize around this one call.

use ledgrid_core::color::PackedRgbw;
use ledgrid_map::gap::GapMask;
use ledgrid_map::mapper::{LogicalMap, MapError};
use ledgrid_map::panel::Panel;

/// Physical-index color access provided by the output driver.
///
/// Indices follow the strip's wiring order. Implementations are expected to
/// tolerate nothing: the controller performs all bounds and sentinel checks
/// before calling through.
pub trait PixelBus {
    /// Number of physical pixels on the bus.
    fn len(&self) -> usize;

    /// Check whether the bus has no pixels.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the color of physical pixel `index`.
    fn color_at(&self, index: usize) -> PackedRgbw;

    /// Write the color of physical pixel `index`.
    fn set_color(&mut self, index: usize, color: PackedRgbw);
}

/// The strip controller: pixel bus plus matrix addressing state.
#[derive(Debug)]
pub struct Strip<B> {
    bus: B,
    panels: Vec<Panel>,
    map: Option<LogicalMap>,
}

impl<B: PixelBus> Strip<B> {
    /// Wrap a bus; starts in 1-dimensional mode with no panels.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            panels: Vec::new(),
            map: None,
        }
    }

    /// Rebuild the logical map from a new panel list and optional gap mask.
    ///
    /// On success the map and panel list are replaced atomically with
    /// respect to readers. On failure matrix mode is disabled, the panel
    /// list is cleared, and addressing falls back to a single row spanning
    /// the whole strip; the error is returned for the caller's information
    /// but requires no handling.
    pub fn configure(&mut self, panels: Vec<Panel>, gap: Option<&GapMask>) -> Result<(), MapError> {
        match LogicalMap::build(&panels, self.bus.len(), gap) {
            Ok(map) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    width = map.width(),
                    height = map.height(),
                    panels = panels.len(),
                    "matrix map published"
                );
                self.panels = panels;
                self.map = Some(map);
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "matrix disabled, falling back to 1D addressing");
                self.panels = Vec::new();
                self.map = None;
                Err(err)
            }
        }
    }

    /// Whether a matrix map is active.
    #[inline]
    pub fn is_matrix(&self) -> bool {
        self.map.is_some()
    }

    /// Logical grid width; the full strip length in 1D mode.
    #[inline]
    pub fn width(&self) -> u16 {
        match &self.map {
            Some(map) => map.width(),
            None => self.bus.len().min(u16::MAX as usize) as u16,
        }
    }

    /// Logical grid height; 1 in 1D mode.
    #[inline]
    pub fn height(&self) -> u16 {
        match &self.map {
            Some(map) => map.height(),
            None => 1,
        }
    }

    /// Number of physical pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.bus.len()
    }

    /// Check whether the strip has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bus.is_empty()
    }

    /// The configured panel list.
    #[inline]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// The published index table, for output drivers.
    #[inline]
    pub fn map(&self) -> Option<&LogicalMap> {
        self.map.as_ref()
    }

    /// The wrapped bus.
    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Write a pixel by flat logical index.
    ///
    /// Routed through the map when one is published (sentinel cells are
    /// skipped); out-of-range indices are dropped.
    pub fn set_pixel(&mut self, index: usize, color: PackedRgbw) {
        match &self.map {
            Some(map) => {
                if let Some(phys) = map.entry(index) {
                    let phys = phys as usize;
                    if phys < self.bus.len() {
                        self.bus.set_color(phys, color);
                    }
                }
            }
            None => {
                if index < self.bus.len() {
                    self.bus.set_color(index, color);
                }
            }
        }
    }

    /// Read a pixel by flat logical index; black when unmapped.
    pub fn pixel(&self, index: usize) -> PackedRgbw {
        match &self.map {
            Some(map) => match map.entry(index) {
                Some(phys) if (phys as usize) < self.bus.len() => self.bus.color_at(phys as usize),
                _ => PackedRgbw::BLACK,
            },
            None => {
                if index < self.bus.len() {
                    self.bus.color_at(index)
                } else {
                    PackedRgbw::BLACK
                }
            }
        }
    }

    /// Write a pixel by logical grid coordinates.
    ///
    /// Out-of-range coordinates and unmapped cells are silently dropped.
    pub fn set_pixel_xy(&mut self, x: i32, y: i32, color: PackedRgbw) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.set_pixel(y as usize * self.width() as usize + x as usize, color);
    }

    /// Read a pixel by logical grid coordinates; black when unmapped.
    pub fn pixel_xy(&self, x: i32, y: i32) -> PackedRgbw {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return PackedRgbw::BLACK;
        };
        if x >= self.width() || y >= self.height() {
            return PackedRgbw::BLACK;
        }
        self.pixel(y as usize * self.width() as usize + x as usize)
    }
}
