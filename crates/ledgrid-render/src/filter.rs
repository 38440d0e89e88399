#![forbid(unsafe_code)]

//! Filter operations: blurs, pans, and uniform dimming.
//!
//! All filters operate in the segment's virtual coordinate space through
//! [`Painter::get`]/[`Painter::set`]. Line-sized temporaries are
//! `SmallVec`-backed so common matrix widths never touch the allocator.

use crate::segment::Painter;
use crate::strip::PixelBus;
use ledgrid_core::color::PackedRgbw;
use smallvec::SmallVec;

/// Axis selector for line-oriented filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Operate along a row.
    Horizontal,
    /// Operate along a column.
    Vertical,
}

/// Eight-way pan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    /// Toward negative x.
    Left,
    /// Toward negative x and negative y.
    UpLeft,
    /// Toward negative y.
    Up,
    /// Toward positive x and negative y.
    UpRight,
    /// Toward positive x.
    Right,
    /// Toward positive x and positive y.
    DownRight,
    /// Toward positive y.
    Down,
    /// Toward negative x and positive y.
    DownLeft,
}

type Line = SmallVec<[PackedRgbw; 64]>;

impl<B: PixelBus> Painter<'_, B> {
    /// Single-pass blur along one row.
    ///
    /// Each cell keeps `255 - amount` of its value and seeps half of
    /// `amount` into both neighbors via a carryover term. The current cell
    /// is rewritten only when its value actually changed; skipping the
    /// unchanged write is a pure optimization and never alters output.
    pub fn blur_row(&mut self, row: u16, amount: u8) {
        if !self.segment().is_active() || amount == 0 {
            return;
        }
        let cols = self.width();
        if row >= self.height() {
            return;
        }
        let keep = 255 - amount;
        let seep = amount >> 1;
        let row = row as i32;
        let mut carryover = PackedRgbw::BLACK;
        for x in 0..cols as i32 {
            let before = self.get(x, row);
            let part = before.scaled(seep);
            let cur = before.scaled(keep).saturating_add(carryover);
            if x > 0 {
                let prev = self.get(x - 1, row).saturating_add(part);
                self.set(x - 1, row, prev);
            }
            if before != cur {
                self.set(x, row, cur);
            }
            carryover = part;
        }
    }

    /// Single-pass blur along one column; see [`blur_row`](Self::blur_row).
    pub fn blur_col(&mut self, col: u16, amount: u8) {
        if !self.segment().is_active() || amount == 0 {
            return;
        }
        let rows = self.height();
        if col >= self.width() {
            return;
        }
        let keep = 255 - amount;
        let seep = amount >> 1;
        let col = col as i32;
        let mut carryover = PackedRgbw::BLACK;
        for y in 0..rows as i32 {
            let before = self.get(col, y);
            let part = before.scaled(seep);
            let cur = before.scaled(keep).saturating_add(carryover);
            if y > 0 {
                let prev = self.get(col, y - 1).saturating_add(part);
                self.set(col, y - 1, prev);
            }
            if before != cur {
                self.set(col, y, cur);
            }
            carryover = part;
        }
    }

    /// Blur every row.
    pub fn blur_rows(&mut self, amount: u8) {
        for row in 0..self.height() {
            self.blur_row(row, amount);
        }
    }

    /// Blur every column.
    pub fn blur_cols(&mut self, amount: u8) {
        for col in 0..self.width() {
            self.blur_col(col, amount);
        }
    }

    /// Two-dimensional blur: rows first, then columns.
    pub fn blur2d(&mut self, amount: u8) {
        self.blur_rows(amount);
        self.blur_cols(amount);
    }

    /// Three-tap weighted box blur along one line.
    ///
    /// Weights are floating point (`seep = amount / 255`,
    /// `keep = 3 - 2 * seep`, divided by 3); a missing edge neighbor reads
    /// as black. The whole line is staged through a temporary buffer so
    /// in-place writes cannot corrupt later reads.
    pub fn box_blur(&mut self, line: u16, axis: Axis, amount: u8) {
        if !self.segment().is_active() || amount == 0 {
            return;
        }
        let cols = self.width();
        let rows = self.height();
        let vertical = axis == Axis::Vertical;
        let length = if vertical { rows } else { cols };
        let across = if vertical { cols } else { rows };
        if line >= across {
            return;
        }
        let seep = amount as f32 / 255.0;
        let keep = 3.0 - 2.0 * seep;
        let mix = |c: u8, p: u8, n: u8| -> u8 {
            ((c as f32 * keep + (p as f32 + n as f32) * seep) / 3.0) as u8
        };

        let mut tmp = Line::with_capacity(length as usize);
        for j in 0..length as i32 {
            let (x, y) = if vertical {
                (line as i32, j)
            } else {
                (j, line as i32)
            };
            let curr = self.get(x, y);
            // Out-of-range neighbors read as black.
            let prev = if vertical {
                self.get(x, y - 1)
            } else {
                self.get(x - 1, y)
            };
            let next = if vertical {
                self.get(x, y + 1)
            } else {
                self.get(x + 1, y)
            };
            tmp.push(PackedRgbw::rgbw(
                mix(curr.r(), prev.r(), next.r()),
                mix(curr.g(), prev.g(), next.g()),
                mix(curr.b(), prev.b(), next.b()),
                mix(curr.w(), prev.w(), next.w()),
            ));
        }
        for (j, &color) in tmp.iter().enumerate() {
            let (x, y) = if vertical {
                (line as i32, j as i32)
            } else {
                (j as i32, line as i32)
            };
            self.set(x, y, color);
        }
    }

    /// Shift all pixels horizontally by a signed delta.
    ///
    /// Shifts of magnitude `>= width` would move everything off-canvas and
    /// are no-ops. Without `wrap`, the cells a shift exposes keep their
    /// prior contents.
    pub fn move_x(&mut self, delta: i32, wrap: bool) {
        if !self.segment().is_active() {
            return;
        }
        let cols = self.width() as i32;
        let rows = self.height() as i32;
        if delta == 0 || delta.abs() >= cols {
            return;
        }
        let mut line: Line = SmallVec::from_elem(PackedRgbw::BLACK, cols as usize);
        for y in 0..rows {
            if delta > 0 {
                for x in 0..cols - delta {
                    line[x as usize] = self.get(x + delta, y);
                }
                for x in cols - delta..cols {
                    let src = if wrap { x + delta - cols } else { x };
                    line[x as usize] = self.get(src, y);
                }
            } else {
                for x in (-delta..cols).rev() {
                    line[x as usize] = self.get(x + delta, y);
                }
                for x in (0..-delta).rev() {
                    let src = if wrap { x + delta + cols } else { x };
                    line[x as usize] = self.get(src, y);
                }
            }
            for x in 0..cols {
                self.set(x, y, line[x as usize]);
            }
        }
    }

    /// Shift all pixels vertically by a signed delta; see
    /// [`move_x`](Self::move_x).
    pub fn move_y(&mut self, delta: i32, wrap: bool) {
        if !self.segment().is_active() {
            return;
        }
        let cols = self.width() as i32;
        let rows = self.height() as i32;
        if delta == 0 || delta.abs() >= rows {
            return;
        }
        let mut line: Line = SmallVec::from_elem(PackedRgbw::BLACK, rows as usize);
        for x in 0..cols {
            if delta > 0 {
                for y in 0..rows - delta {
                    line[y as usize] = self.get(x, y + delta);
                }
                for y in rows - delta..rows {
                    let src = if wrap { y + delta - rows } else { y };
                    line[y as usize] = self.get(x, src);
                }
            } else {
                for y in (-delta..rows).rev() {
                    line[y as usize] = self.get(x, y + delta);
                }
                for y in (0..-delta).rev() {
                    let src = if wrap { y + delta + rows } else { y };
                    line[y as usize] = self.get(x, src);
                }
            }
            for y in 0..rows {
                self.set(x, y, line[y as usize]);
            }
        }
    }

    /// Pan the segment along an eight-way compass direction, composing
    /// independent x and y shifts.
    pub fn shift(&mut self, direction: Compass, delta: u16, wrap: bool) {
        if delta == 0 {
            return;
        }
        let d = delta as i32;
        match direction {
            Compass::Left => self.move_x(d, wrap),
            Compass::UpLeft => {
                self.move_x(d, wrap);
                self.move_y(d, wrap);
            }
            Compass::Up => self.move_y(d, wrap),
            Compass::UpRight => {
                self.move_x(-d, wrap);
                self.move_y(d, wrap);
            }
            Compass::Right => self.move_x(-d, wrap),
            Compass::DownRight => {
                self.move_x(-d, wrap);
                self.move_y(-d, wrap);
            }
            Compass::Down => self.move_y(-d, wrap),
            Compass::DownLeft => {
                self.move_x(d, wrap);
                self.move_y(-d, wrap);
            }
        }
    }

    /// Scale every pixel's channels proportionally; 255 leaves the segment
    /// unchanged, 0 blacks it out.
    pub fn dim(&mut self, scale: u8) {
        if !self.segment().is_active() {
            return;
        }
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let scaled = self.get(x, y).scaled(scale);
                self.set(x, y, scaled);
            }
        }
    }
}
