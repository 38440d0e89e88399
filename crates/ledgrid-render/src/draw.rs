#![forbid(unsafe_code)]

//! Drawing primitives.
//!
//! Lines, circles, glyphs, and sub-pixel plots, all built on
//! [`Painter::set`]/[`Painter::get`] so transforms, brightness, grouping,
//! and mirroring apply uniformly. The paint handle also implements the
//! `embedded-graphics` [`DrawTarget`] so its primitives and text styles can
//! draw through the same pipeline.

use crate::font;
use crate::segment::Painter;
use crate::strip::PixelBus;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use ledgrid_core::color::PackedRgbw;

/// Glyph rotation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Upright.
    #[default]
    R0,
    /// Rotated 90 degrees clockwise.
    R90,
    /// Upside down.
    R180,
    /// Rotated 90 degrees counter-clockwise.
    R270,
}

impl<B: PixelBus> Painter<'_, B> {
    /// Draw a straight line between two points, both endpoints included.
    ///
    /// Integer Bresenham stepping. If either endpoint lies outside the
    /// virtual extent the whole call is rejected and nothing is drawn.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: PackedRgbw) {
        if !self.segment().is_active() {
            return;
        }
        let cols = self.width() as i32;
        let rows = self.height() as i32;
        if x0 < 0 || x1 < 0 || y0 < 0 || y1 < 0 || x0 >= cols || x1 >= cols || y0 >= rows || y1 >= rows
        {
            return;
        }
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = (y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x += sx;
            }
            if e2 < dy {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a circle outline with the midpoint algorithm, plotting all
    /// eight octant points per step. Radius 0 is a no-op.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: u8, color: PackedRgbw) {
        if !self.segment().is_active() || radius == 0 {
            return;
        }
        let r = radius as i32;
        let mut d = 3 - 2 * r;
        let mut y = r;
        let mut x = 0;
        while y >= x {
            self.set(cx + x, cy + y, color);
            self.set(cx - x, cy + y, color);
            self.set(cx + x, cy - y, color);
            self.set(cx - x, cy - y, color);
            self.set(cx + y, cy + x, color);
            self.set(cx - y, cy + x, color);
            self.set(cx + y, cy - x, color);
            self.set(cx - y, cy - x, color);
            x += 1;
            if d > 0 {
                y -= 1;
                d += 4 * (x - y) + 10;
            } else {
                d += 4 * x + 6;
            }
        }
    }

    /// Fill a circle: every cell of the bounding square whose squared
    /// distance from the center is within radius². Radius 0 is a no-op.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: u8, color: PackedRgbw) {
        if !self.segment().is_active() || radius == 0 {
            return;
        }
        let cols = self.width() as i32;
        let rows = self.height() as i32;
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r
                    && cx + dx >= 0
                    && cy + dy >= 0
                    && cx + dx < cols
                    && cy + dy < rows
                {
                    self.set(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw one glyph at `(x, y)` in a `width x height` font.
    ///
    /// Only ASCII 32–126 and the five supported font sizes render; anything
    /// else is a no-op. Each glyph row samples its color from a two-color
    /// gradient over the glyph height (`color2` of `None` disables the
    /// gradient). Off-canvas cells are skipped individually rather than
    /// rejecting the glyph.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_character(
        &mut self,
        ch: char,
        x: i32,
        y: i32,
        width: u8,
        height: u8,
        color: PackedRgbw,
        color2: Option<PackedRgbw>,
        rotation: Rotation,
    ) {
        if !self.segment().is_active() {
            return;
        }
        if !('\u{20}'..='\u{7e}').contains(&ch) {
            return;
        }
        let Some(mono) = font::lookup(width, height) else {
            return;
        };
        let gradient_to = color2.unwrap_or(color);
        let w = width as i32;
        let h = height as i32;

        for row in 0..height {
            let row_color = color.blend(
                gradient_to,
                (((row as u16 + 1) * 255) / height as u16) as u8,
            );
            for col in 0..width {
                if !font::glyph_pixel(mono, ch, col, row) {
                    continue;
                }
                let (gc, gr) = (col as i32, row as i32);
                let (tx, ty) = match rotation {
                    Rotation::R0 => (x + gc, y + gr),
                    Rotation::R90 => (x + gr, y + (w - 1) - gc),
                    Rotation::R180 => (x + (w - 1) - gc, y + (h - 1) - gr),
                    Rotation::R270 => (x + (h - 1) - gr, y + gc),
                };
                self.set(tx, ty, row_color);
            }
        }
    }

    /// Wu-style anti-aliased plot at 24.8 fixed-point coordinates.
    ///
    /// The fractional bytes and their complements produce four bilinear
    /// weights (`(a*b + a + b) >> 8`, summing to ~256); the weighted color
    /// is saturating-added into the four neighboring cells.
    pub fn wu_pixel(&mut self, x: u32, y: u32, color: PackedRgbw) {
        if !self.segment().is_active() {
            return;
        }
        let xx = (x & 0xFF) as u16;
        let yy = (y & 0xFF) as u16;
        let ix = 255 - xx;
        let iy = 255 - yy;
        let wu = |a: u16, b: u16| -> u16 { (a * b + a + b) >> 8 };
        let weights = [wu(ix, iy), wu(xx, iy), wu(ix, yy), wu(xx, yy)];
        for (i, &weight) in weights.iter().enumerate() {
            let px = (x >> 8) as i32 + (i as i32 & 1);
            let py = (y >> 8) as i32 + ((i as i32 >> 1) & 1);
            let base = self.get(px, py);
            let part = PackedRgbw::rgbw(
                ((color.r() as u16 * weight) >> 8) as u8,
                ((color.g() as u16 * weight) >> 8) as u8,
                ((color.b() as u16 * weight) >> 8) as u8,
                ((color.w() as u16 * weight) >> 8) as u8,
            );
            self.set(px, py, base.saturating_add(part));
        }
    }
}

impl<B: PixelBus> OriginDimensions for Painter<'_, B> {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}

impl<B: PixelBus> DrawTarget for Painter<'_, B> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(
                point.x,
                point.y,
                PackedRgbw::rgb(color.r(), color.g(), color.b()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Rotation;
    use crate::headless::MemoryBus;
    use crate::segment::{Painter, Segment};
    use crate::strip::Strip;
    use ledgrid_core::color::PackedRgbw;
    use ledgrid_map::panel::Panel;

    const RED: PackedRgbw = PackedRgbw::RED;

    fn matrix(w: u16, h: u16) -> Strip<MemoryBus> {
        let mut strip = Strip::new(MemoryBus::new(w as usize * h as usize));
        strip.configure(vec![Panel::new(w, h)], None).unwrap();
        strip
    }

    fn lit(painter: &Painter<'_, MemoryBus>) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..painter.height() as i32 {
            for x in 0..painter.width() as i32 {
                if painter.get(x, y) != PackedRgbw::BLACK {
                    out.push((x, y));
                }
            }
        }
        out
    }

    // --- Lines ---

    #[test]
    fn horizontal_line_is_inclusive() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_line(1, 2, 5, 2, RED);
        assert_eq!(
            lit(&painter),
            vec![(1, 2), (2, 2), (3, 2), (4, 2), (5, 2)]
        );
    }

    #[test]
    fn diagonal_line_hits_both_endpoints() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_line(0, 0, 7, 7, RED);
        let cells = lit(&painter);
        assert!(cells.contains(&(0, 0)));
        assert!(cells.contains(&(7, 7)));
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn line_with_endpoint_out_of_bounds_draws_nothing() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_line(0, 0, 8, 0, RED);
        painter.draw_line(-1, 0, 3, 0, RED);
        assert!(lit(&painter).is_empty());
    }

    // --- Circles ---

    #[test]
    fn circle_radius_zero_is_a_no_op() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_circle(4, 4, 0, RED);
        painter.fill_circle(4, 4, 0, RED);
        assert!(lit(&painter).is_empty());
    }

    #[test]
    fn unit_circle_plots_the_four_compass_points() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_circle(4, 4, 1, RED);
        let mut cells = lit(&painter);
        cells.sort_unstable();
        assert_eq!(cells, vec![(3, 4), (4, 3), (4, 5), (5, 4)]);
    }

    #[test]
    fn filled_unit_circle_is_a_plus() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.fill_circle(4, 4, 1, RED);
        let mut cells = lit(&painter);
        cells.sort_unstable();
        assert_eq!(cells, vec![(3, 4), (4, 3), (4, 4), (4, 5), (5, 4)]);
    }

    #[test]
    fn filled_circle_clips_at_the_edge() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.fill_circle(0, 0, 2, RED);
        // Only the in-bounds quadrant survives.
        assert!(lit(&painter).iter().all(|&(x, y)| x >= 0 && y >= 0));
        assert!(!lit(&painter).is_empty());
    }

    // --- Glyphs ---

    #[test]
    fn glyph_draws_inside_its_box() {
        let mut strip = matrix(12, 12);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_character('A', 2, 2, 5, 8, RED, None, Rotation::R0);
        let cells = lit(&painter);
        assert!(!cells.is_empty());
        assert!(cells
            .iter()
            .all(|&(x, y)| (2..7).contains(&x) && (2..10).contains(&y)));
    }

    #[test]
    fn unsupported_font_size_is_a_no_op() {
        let mut strip = matrix(12, 12);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_character('A', 0, 0, 9, 9, RED, None, Rotation::R0);
        assert!(lit(&painter).is_empty());
    }

    #[test]
    fn non_ascii_characters_are_skipped() {
        let mut strip = matrix(12, 12);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_character('\n', 0, 0, 5, 8, RED, None, Rotation::R0);
        painter.draw_character('é', 0, 0, 5, 8, RED, None, Rotation::R0);
        assert!(lit(&painter).is_empty());
    }

    #[test]
    fn rotated_glyph_swaps_its_bounding_box() {
        let mut strip = matrix(16, 16);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_character('H', 1, 1, 5, 8, RED, None, Rotation::R90);
        let cells = lit(&painter);
        assert!(!cells.is_empty());
        // 5x8 glyph rotated a quarter turn spans 8 wide by 5 tall.
        assert!(cells
            .iter()
            .all(|&(x, y)| (1..9).contains(&x) && (1..6).contains(&y)));
    }

    #[test]
    fn rotations_produce_congruent_pixel_counts() {
        let count = |rotation: Rotation| {
            let mut strip = matrix(16, 16);
            let mut seg = Segment::covering(&strip);
            let mut painter = seg.painter(&mut strip);
            painter.draw_character('R', 4, 4, 5, 8, RED, None, rotation);
            lit(&painter).len()
        };
        let upright = count(Rotation::R0);
        assert!(upright > 0);
        assert_eq!(count(Rotation::R90), upright);
        assert_eq!(count(Rotation::R180), upright);
        assert_eq!(count(Rotation::R270), upright);
    }

    #[test]
    fn glyph_gradient_varies_down_the_rows() {
        let mut strip = matrix(12, 12);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.draw_character(
            '#',
            0,
            0,
            5,
            8,
            PackedRgbw::rgb(255, 0, 0),
            Some(PackedRgbw::rgb(0, 0, 255)),
            Rotation::R0,
        );
        let cells = lit(&painter);
        let top = cells.iter().map(|&(_, y)| y).min().unwrap();
        let bottom = cells.iter().map(|&(_, y)| y).max().unwrap();
        let top_color = painter.get(cells.iter().find(|&&(_, y)| y == top).unwrap().0, top);
        let bottom_color =
            painter.get(cells.iter().find(|&&(_, y)| y == bottom).unwrap().0, bottom);
        assert!(top_color.r() > bottom_color.r());
        assert!(top_color.b() < bottom_color.b());
    }

    // --- Wu pixels ---

    #[test]
    fn centered_wu_pixel_spreads_to_four_cells() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.wu_pixel((3 << 8) | 0x80, (3 << 8) | 0x80, PackedRgbw::rgb(255, 255, 255));
        let cells = lit(&painter);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn wu_weights_conserve_intensity() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.wu_pixel((2 << 8) | 0x3a, (5 << 8) | 0xc1, PackedRgbw::rgb(255, 255, 255));
        let total: u32 = lit(&painter)
            .iter()
            .map(|&(x, y)| painter.get(x, y).r() as u32)
            .sum();
        // Four truncating weights sum to 256 within rounding slack.
        assert!((248..=256).contains(&total), "total intensity {total}");
    }

    #[test]
    fn aligned_wu_pixel_lands_on_one_cell() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        painter.wu_pixel(4 << 8, 4 << 8, PackedRgbw::rgb(200, 0, 0));
        // Zero fractions put the full 255 weight on the base cell (one off
        // from exact through the truncating multiply) and zero elsewhere.
        assert_eq!(painter.get(4, 4).r(), 199);
        assert_eq!(lit(&painter), vec![(4, 4)]);
    }

    #[test]
    fn wu_pixel_saturates_instead_of_wrapping() {
        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        let mut painter = seg.painter(&mut strip);
        for _ in 0..8 {
            painter.wu_pixel((3 << 8) | 0x80, 3 << 8, PackedRgbw::rgb(255, 255, 255));
        }
        for (x, y) in lit(&painter) {
            assert!(painter.get(x, y).r() >= painter.get(x, y).g());
        }
        assert!(painter.get(3, 3).r() == 255 || painter.get(4, 3).r() == 255);
    }

    // --- embedded-graphics integration ---

    #[test]
    fn draw_target_routes_through_the_pipeline() {
        use embedded_graphics::Drawable;
        use embedded_graphics::Pixel;
        use embedded_graphics::pixelcolor::Rgb888;
        use embedded_graphics::prelude::Point;

        let mut strip = matrix(8, 8);
        let mut seg = Segment::covering(&strip);
        seg.mirror_x = true;
        let mut painter = seg.painter(&mut strip);
        Pixel(Point::new(1, 1), Rgb888::new(255, 0, 0))
            .draw(&mut painter)
            .unwrap();
        drop(painter);
        let pixels = strip.bus().pixels();
        assert_eq!(pixels[8 + 1], RED);
        assert_eq!(pixels[8 + 6], RED);
    }
}
