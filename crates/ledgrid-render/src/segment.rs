#![forbid(unsafe_code)]

//! Segments and the coordinate/transform pipeline.
//!
//! A [`Segment`] is an independently transformable drawing region of the
//! logical grid. Effects address it in a virtual coordinate space of
//! `virtual_width() x virtual_height()` pixels; the pipeline applies
//! brightness, reflection, transposition, grouping, and mirroring on the
//! way to the physical buffer.
//!
//! # Contract
//!
//! Writes outside the virtual extent are silently dropped, at every
//! primitive. Animation code routinely produces transient out-of-range
//! coordinates from geometric formulas; dropping them is the contract the
//! whole drawing layer relies on, not an omission.
//!
//! Transform fields are plain mutable state. Mutating them between a
//! frame's draw calls and its transition render is undefined; reconfigure
//! between frames only.

use crate::strip::{PixelBus, Strip};
use crate::transition::Transition;
use ledgrid_core::color::PackedRgbw;
use ledgrid_core::geometry::Rect;

/// An addressable sub-region of the logical grid with its own transform
/// state.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Physical region covered within the logical grid.
    pub bounds: Rect,
    /// Reflect the x axis.
    pub reverse_x: bool,
    /// Reflect the y axis.
    pub reverse_y: bool,
    /// Swap the axes (after reflection).
    pub transpose: bool,
    /// Mirror writes across the vertical centerline.
    pub mirror_x: bool,
    /// Mirror writes across the horizontal centerline.
    pub mirror_y: bool,
    grouping: u8,
    brightness: u8,
    render_buffer: Option<Vec<PackedRgbw>>,
    pub(crate) transition: Option<Transition>,
}

impl Segment {
    /// Create a segment over the given physical region, untransformed and
    /// at full brightness.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            reverse_x: false,
            reverse_y: false,
            transpose: false,
            mirror_x: false,
            mirror_y: false,
            grouping: 1,
            brightness: 255,
            render_buffer: None,
            transition: None,
        }
    }

    /// Create a segment covering the whole logical grid of a strip.
    pub fn covering<B: PixelBus>(strip: &Strip<B>) -> Self {
        Self::new(Rect::from_size(strip.width(), strip.height()))
    }

    /// Pixel grouping factor: an NxN block of physical pixels acts as one
    /// virtual pixel.
    #[inline]
    pub fn grouping(&self) -> u8 {
        self.grouping
    }

    /// Set the grouping factor (floored to 1).
    pub fn set_grouping(&mut self, grouping: u8) {
        self.grouping = grouping.max(1);
    }

    /// Brightness scale applied to written colors; 255 is full.
    #[inline]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set the brightness scale.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Virtual width in drawable pixels; 0 marks an inactive segment.
    ///
    /// Derived from the physical bounds, transposition, and grouping —
    /// never stored.
    #[inline]
    pub fn virtual_width(&self) -> u16 {
        let extent = if self.transpose {
            self.bounds.height
        } else {
            self.bounds.width
        };
        extent.div_ceil(self.grouping as u16)
    }

    /// Virtual height in drawable pixels; at least 1 for active segments.
    #[inline]
    pub fn virtual_height(&self) -> u16 {
        let extent = if self.transpose {
            self.bounds.width
        } else {
            self.bounds.height
        };
        extent.div_ceil(self.grouping as u16)
    }

    /// Whether the segment covers any drawable pixels.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.virtual_width() > 0 && self.virtual_height() > 0
    }

    /// Flat virtual index with wrap-around, for effect-local buffers.
    #[inline]
    pub fn xy(&self, x: u16, y: u16) -> usize {
        if !self.is_active() {
            return 0;
        }
        let w = self.virtual_width() as usize;
        let h = self.virtual_height() as usize;
        (x as usize % w) + (y as usize % h) * w
    }

    /// Attach a private render buffer; subsequent writes land there instead
    /// of the physical buffer, bypassing the transform pipeline entirely.
    ///
    /// The buffer holds final logical-space data and is expected to cover
    /// `virtual_width() * virtual_height()` pixels.
    pub fn attach_render_buffer(&mut self, buffer: Vec<PackedRgbw>) {
        self.render_buffer = Some(buffer);
    }

    /// Detach and return the private render buffer, if any.
    pub fn take_render_buffer(&mut self) -> Option<Vec<PackedRgbw>> {
        self.render_buffer.take()
    }

    /// Whether a private render buffer is attached.
    #[inline]
    pub fn has_render_buffer(&self) -> bool {
        self.render_buffer.is_some()
    }

    /// Start a transition between two frame snapshots.
    ///
    /// The snapshots are resized to the current virtual extent so a stale
    /// capture can never fault a frame; the segment owns them until
    /// progress reaches 65535.
    pub fn begin_transition(&mut self, transition: Transition) {
        let len = self.virtual_width() as usize * self.virtual_height() as usize;
        self.transition = Some(transition.fitted_to(len));
    }

    /// Advance the in-flight transition; no-op when none is running.
    pub fn set_transition_progress(&mut self, progress: u16) {
        if let Some(transition) = self.transition.as_mut() {
            transition.set_progress(progress);
        }
    }

    /// Whether a transition is in flight.
    #[inline]
    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Borrow a paint handle over this segment and a strip.
    pub fn painter<'a, B: PixelBus>(&'a mut self, strip: &'a mut Strip<B>) -> Painter<'a, B> {
        Painter { seg: self, strip }
    }
}

/// Paint handle: a segment borrowed together with the strip it draws on.
///
/// All drawing, filter, and transition operations run through this type so
/// that every pixel passes the same transform pipeline.
#[derive(Debug)]
pub struct Painter<'a, B: PixelBus> {
    pub(crate) seg: &'a mut Segment,
    pub(crate) strip: &'a mut Strip<B>,
}

impl<B: PixelBus> Painter<'_, B> {
    /// Virtual width of the segment being painted.
    #[inline]
    pub fn width(&self) -> u16 {
        self.seg.virtual_width()
    }

    /// Virtual height of the segment being painted.
    #[inline]
    pub fn height(&self) -> u16 {
        self.seg.virtual_height()
    }

    /// The segment under the handle.
    #[inline]
    pub fn segment(&self) -> &Segment {
        self.seg
    }

    /// Write one virtual pixel.
    ///
    /// Pipeline order: render-buffer bypass, brightness, reflection,
    /// transposition, grouping expansion, physical bounds check, then the
    /// grouped write with mirror write-throughs. Out-of-range coordinates
    /// are dropped silently.
    pub fn set(&mut self, x: i32, y: i32, color: PackedRgbw) {
        let vw = self.seg.virtual_width() as i32;
        let vh = self.seg.virtual_height() as i32;
        if vw == 0 || vh == 0 || x < 0 || y < 0 || x >= vw || y >= vh {
            return;
        }

        if let Some(buffer) = self.seg.render_buffer.as_mut() {
            if let Some(slot) = buffer.get_mut(y as usize * vw as usize + x as usize) {
                *slot = color;
            }
            return;
        }

        let color = color.scaled(self.seg.brightness);

        let mut x = x as u16;
        let mut y = y as u16;
        if self.seg.reverse_x {
            x = vw as u16 - 1 - x;
        }
        if self.seg.reverse_y {
            y = vh as u16 - 1 - y;
        }
        if self.seg.transpose {
            core::mem::swap(&mut x, &mut y);
        }

        let grouping = self.seg.grouping as u16;
        let x = x * grouping;
        let y = y * grouping;
        let pw = self.seg.bounds.width;
        let ph = self.seg.bounds.height;
        if x >= pw || y >= ph {
            return;
        }

        for j in 0..grouping {
            for i in 0..grouping {
                let xx = x + i;
                let yy = y + j;
                if xx >= pw || yy >= ph {
                    continue;
                }
                self.write_physical(xx, yy, color);
                if self.seg.mirror_x {
                    if self.seg.transpose {
                        self.write_physical(xx, ph - 1 - yy, color);
                    } else {
                        self.write_physical(pw - 1 - xx, yy, color);
                    }
                }
                if self.seg.mirror_y {
                    if self.seg.transpose {
                        self.write_physical(pw - 1 - xx, yy, color);
                    } else {
                        self.write_physical(xx, ph - 1 - yy, color);
                    }
                }
                if self.seg.mirror_x && self.seg.mirror_y {
                    self.write_physical(pw - 1 - xx, ph - 1 - yy, color);
                }
            }
        }
    }

    #[inline]
    fn write_physical(&mut self, x: u16, y: u16, color: PackedRgbw) {
        self.strip.set_pixel_xy(
            (self.seg.bounds.x + x) as i32,
            (self.seg.bounds.y + y) as i32,
            color,
        );
    }

    /// Read one virtual pixel; black outside the extent.
    ///
    /// Applies the same pipeline as [`set`](Self::set) minus brightness and
    /// mirroring, and performs exactly one physical read.
    pub fn get(&self, x: i32, y: i32) -> PackedRgbw {
        let vw = self.seg.virtual_width() as i32;
        let vh = self.seg.virtual_height() as i32;
        if vw == 0 || vh == 0 || x < 0 || y < 0 || x >= vw || y >= vh {
            return PackedRgbw::BLACK;
        }

        if let Some(buffer) = self.seg.render_buffer.as_ref() {
            return buffer
                .get(y as usize * vw as usize + x as usize)
                .copied()
                .unwrap_or(PackedRgbw::BLACK);
        }

        let mut x = x as u16;
        let mut y = y as u16;
        if self.seg.reverse_x {
            x = vw as u16 - 1 - x;
        }
        if self.seg.reverse_y {
            y = vh as u16 - 1 - y;
        }
        if self.seg.transpose {
            core::mem::swap(&mut x, &mut y);
        }
        let grouping = self.seg.grouping as u16;
        let x = x * grouping;
        let y = y * grouping;
        if x >= self.seg.bounds.width || y >= self.seg.bounds.height {
            return PackedRgbw::BLACK;
        }
        self.strip.pixel_xy(
            (self.seg.bounds.x + x) as i32,
            (self.seg.bounds.y + y) as i32,
        )
    }

    /// Anti-aliased point write on normalized `[0,1] x [0,1]` coordinates.
    ///
    /// With `aa` the color is blended into up to four neighboring cells at
    /// opacities derived from the squared axis distances; neighbors that
    /// coincide on a row or column are visited once each. Without `aa` the
    /// point rounds to the nearest cell and writes opaquely. Coordinates
    /// outside the unit square are dropped.
    pub fn set_aa(&mut self, x: f32, y: f32, color: PackedRgbw, aa: bool) {
        if !self.seg.is_active() {
            return;
        }
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return;
        }

        let cols = self.width();
        let rows = self.height();
        let fx = x * (cols - 1) as f32;
        let fy = y * (rows - 1) as f32;

        if !aa {
            self.set(fx.round() as i32, fy.round() as i32, color);
            return;
        }

        let xl = (fx - 0.49).round() as i32;
        let xr = (fx + 0.49).round() as i32;
        let yt = (fy - 0.49).round() as i32;
        let yb = (fy + 0.49).round() as i32;
        let dl = (fx - xl as f32) * (fx - xl as f32);
        let dr = (xr as f32 - fx) * (xr as f32 - fx);
        let dt = (fy - yt as f32) * (fy - yt as f32);
        let db = (yb as f32 - fy) * (yb as f32 - fy);

        if xl != xr && yt != yb {
            self.blend_at(xl, yt, color, (dl * dt).sqrt());
            self.blend_at(xr, yt, color, (dr * dt).sqrt());
            self.blend_at(xl, yb, color, (dl * db).sqrt());
            self.blend_at(xr, yb, color, (dr * db).sqrt());
        } else if xl != xr {
            self.blend_at(xl, yt, color, dl);
            self.blend_at(xr, yt, color, dr);
        } else if yt != yb {
            self.blend_at(xl, yt, color, dt);
            self.blend_at(xl, yb, color, db);
        } else {
            self.set(xl, yt, color);
        }
    }

    /// Blend `color` over the cell's current value at a `[0,1]` weight;
    /// weight 0 writes the color opaquely.
    fn blend_at(&mut self, x: i32, y: i32, color: PackedRgbw, weight: f32) {
        let existing = self.get(x, y);
        self.set(x, y, color.blend(existing, (weight * 255.0) as u8));
    }

    /// Paint every virtual pixel with one color.
    pub fn fill(&mut self, color: PackedRgbw) {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                self.set(x, y, color);
            }
        }
    }

    /// Paint the segment black.
    pub fn clear(&mut self) {
        self.fill(PackedRgbw::BLACK);
    }

    /// Capture the virtual grid as a flat row-major snapshot.
    pub fn snapshot(&self) -> Vec<PackedRgbw> {
        let w = self.width() as i32;
        let h = self.height() as i32;
        let mut out = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                out.push(self.get(x, y));
            }
        }
        out
    }
}
