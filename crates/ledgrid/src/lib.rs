#![forbid(unsafe_code)]

//! Public facade for the ledgrid rendering layer.
//!
//! Converts an arbitrary physical arrangement of LED panels into a uniform
//! logical pixel grid and provides the drawing, blending, filtering, and
//! transition primitives animation effects paint it with. Re-exports the
//! common types from the internal crates and offers a lightweight prelude.
//!
//! ```
//! use ledgrid::prelude::*;
//!
//! let mut strip = Strip::new(MemoryBus::new(64));
//! strip
//!     .configure(vec![Panel::new(8, 8).serpentine()], None)
//!     .unwrap();
//!
//! let mut segment = Segment::covering(&strip);
//! let mut painter = segment.painter(&mut strip);
//! painter.draw_line(0, 0, 7, 7, PackedRgbw::RED);
//! painter.fill_circle(4, 4, 2, PackedRgbw::rgb(0, 128, 255));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use ledgrid_core::color::PackedRgbw;
pub use ledgrid_core::geometry::Rect;

// --- Mapping re-exports ----------------------------------------------------

pub use ledgrid_map::gap::{GapMask, GapState};
pub use ledgrid_map::mapper::{LogicalMap, MapError, MAX_PIXELS, UNMAPPED};
pub use ledgrid_map::panel::{Panel, StartCorner};

// --- Render re-exports -----------------------------------------------------

pub use ledgrid_render::draw::Rotation;
pub use ledgrid_render::filter::{Axis, Compass};
pub use ledgrid_render::headless::MemoryBus;
pub use ledgrid_render::segment::{Painter, Segment};
pub use ledgrid_render::strip::{PixelBus, Strip};
pub use ledgrid_render::transition::{Transition, TransitionStyle};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::{
        Axis, Compass, GapMask, GapState, LogicalMap, MapError, MemoryBus, Painter, PackedRgbw,
        Panel, PixelBus, Rect, Rotation, Segment, StartCorner, Strip, Transition, TransitionStyle,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn facade_wires_the_layers_together() {
        let mut strip = Strip::new(MemoryBus::new(16));
        strip.configure(vec![Panel::new(4, 4)], None).unwrap();
        let mut segment = Segment::covering(&strip);
        segment.painter(&mut strip).set(1, 1, PackedRgbw::GREEN);
        assert_eq!(strip.bus().pixels()[5], PackedRgbw::GREEN);
    }
}
