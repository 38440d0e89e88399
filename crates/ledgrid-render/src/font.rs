#![forbid(unsafe_code)]

//! Glyph lookup and sampling.
//!
//! Character rendering uses the `embedded-graphics` ASCII mono fonts; five
//! fixed sizes are supported, selected by exact width x height. The glyph
//! rasterizer samples individual pixels straight out of the font atlas so
//! the renderer can apply per-row gradients and rotation itself.

use embedded_graphics::image::GetPixel;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_5X8, FONT_6X9, FONT_6X12, FONT_7X13};
use embedded_graphics::mono_font::mapping::GlyphMapping;
use embedded_graphics::prelude::*;

/// Resolve a supported glyph size. Unsupported sizes render nothing.
pub(crate) fn lookup(width: u8, height: u8) -> Option<&'static MonoFont<'static>> {
    match (width, height) {
        (4, 6) => Some(&FONT_4X6),
        (5, 8) => Some(&FONT_5X8),
        (6, 9) => Some(&FONT_6X9),
        (6, 12) => Some(&FONT_6X12),
        (7, 13) => Some(&FONT_7X13),
        _ => None,
    }
}

/// Whether glyph pixel `(col, row)` of `ch` is set.
///
/// Glyphs are packed left-to-right in the atlas, wrapping at the image
/// width; out-of-atlas samples read as unset.
pub(crate) fn glyph_pixel(font: &MonoFont<'_>, ch: char, col: u8, row: u8) -> bool {
    let glyph = font.glyph_mapping.index(ch);
    let per_row = (font.image.size().width / font.character_size.width).max(1) as usize;
    let x = (glyph % per_row) as u32 * font.character_size.width + col as u32;
    let y = (glyph / per_row) as u32 * font.character_size.height + row as u32;
    font.image
        .pixel(Point::new(x as i32, y as i32))
        .is_some_and(|p| p.is_on())
}
