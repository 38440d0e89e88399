#![forbid(unsafe_code)]

//! Dual-buffer frame transitions.
//!
//! While a transition is in flight the segment owns two full-frame
//! snapshots — the outgoing and the incoming frame — and
//! [`Painter::render_transition`] composites them according to the selected
//! style and a 16-bit progress value. Every composited pixel goes through
//! [`Painter::set`], so brightness, grouping, and mirroring apply exactly
//! as they do for direct drawing.
//!
//! Progress runs from 0 (pure outgoing frame) to 65535 (pure incoming
//! frame); once it arrives there both snapshots are released.

use crate::segment::Painter;
use crate::strip::PixelBus;
use ledgrid_core::color::PackedRgbw;

/// How the incoming frame replaces the outgoing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionStyle {
    /// Incoming frame pushes the outgoing frame off to the right.
    PushRight,
    /// Push toward the left edge.
    PushLeft,
    /// Push toward the top edge.
    PushUp,
    /// Push toward the bottom edge.
    PushDown,
    /// Reveal sweeping from the left edge rightward.
    SwipeRight,
    /// Reveal sweeping from the right edge leftward.
    SwipeLeft,
    /// Reveal sweeping from the bottom edge upward.
    SwipeUp,
    /// Reveal sweeping from the top edge downward.
    SwipeDown,
    /// Reveal collapsing from both side edges toward the midline.
    OutsideIn,
    /// Reveal expanding from the midline toward both side edges.
    InsideOut,
    /// Per-pixel randomized reveal, deterministic per index.
    Dissolve,
    /// Proportional per-channel cross-fade.
    #[default]
    Fade,
}

/// An in-flight transition: style, progress, and the two frame snapshots.
#[derive(Debug, Clone)]
pub struct Transition {
    style: TransitionStyle,
    progress: u16,
    from: Vec<PackedRgbw>,
    to: Vec<PackedRgbw>,
}

impl Transition {
    /// Start a transition at progress 0 between an outgoing (`from`) and
    /// incoming (`to`) snapshot.
    pub fn new(style: TransitionStyle, from: Vec<PackedRgbw>, to: Vec<PackedRgbw>) -> Self {
        Self {
            style,
            progress: 0,
            from,
            to,
        }
    }

    /// The selected style.
    #[inline]
    pub fn style(&self) -> TransitionStyle {
        self.style
    }

    /// Interpolation position in `[0, 65535]`.
    #[inline]
    pub fn progress(&self) -> u16 {
        self.progress
    }

    /// Move the interpolation position.
    pub fn set_progress(&mut self, progress: u16) {
        self.progress = progress;
    }

    /// Whether the incoming frame has fully arrived.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.progress == u16::MAX
    }

    /// Pad or truncate both snapshots to `len` pixels so a stale capture
    /// can never fault a frame.
    #[must_use]
    pub(crate) fn fitted_to(mut self, len: usize) -> Self {
        self.from.resize(len, PackedRgbw::BLACK);
        self.to.resize(len, PackedRgbw::BLACK);
        self
    }

    #[inline]
    fn from_at(&self, index: i32) -> PackedRgbw {
        self.from
            .get(index as usize)
            .copied()
            .unwrap_or(PackedRgbw::BLACK)
    }

    #[inline]
    fn to_at(&self, index: i32) -> PackedRgbw {
        self.to
            .get(index as usize)
            .copied()
            .unwrap_or(PackedRgbw::BLACK)
    }
}

/// Avalanche hash giving each pixel index a stable pseudo-random value.
pub(crate) fn hash_index(mut s: u32) -> u32 {
    s = ((s >> 16) ^ s).wrapping_mul(0x45d9_f3b);
    s = ((s >> 16) ^ s).wrapping_mul(0x45d9_f3b);
    (s >> 16) ^ s
}

impl<B: PixelBus> Painter<'_, B> {
    /// Composite the in-flight transition into the segment.
    ///
    /// The segment is cleared to black first: at low frame rates the
    /// computed offsets can skip coordinates, and if the target effect does
    /// not repaint every pixel the skipped ones would otherwise linger in a
    /// transitional state.
    ///
    /// No-op when no transition is in flight. When called with progress at
    /// 65535 the final frame is drawn and the snapshots are released.
    pub fn render_transition(&mut self) {
        if !self.segment().is_active() {
            return;
        }
        let Some(tr) = self.seg.transition.take() else {
            return;
        };

        let w = self.width() as i32;
        let h = self.height() as i32;
        let progress = tr.progress() as u32;

        self.clear();

        if tr.is_complete() {
            // The incoming frame has fully arrived; draw it and let the
            // snapshots go.
            for x in 0..w {
                for y in 0..h {
                    self.set(x, y, tr.to_at(y * w + x));
                }
            }
            return;
        }

        match tr.style() {
            TransitionStyle::PushRight => {
                let pos = (progress * w as u32 / 0xFFFF) as i32;
                for x in pos..w {
                    for y in 0..h {
                        self.set(x, y, tr.from_at(y * w + (x - pos)));
                    }
                }
                for x in 0..pos {
                    for y in 0..h {
                        self.set(x, y, tr.to_at(y * w + (x - pos + w)));
                    }
                }
            }
            TransitionStyle::PushLeft => {
                let pos = ((0xFFFF - progress) * w as u32 / 0xFFFF) as i32;
                for x in 0..pos {
                    for y in 0..h {
                        self.set(x, y, tr.from_at(y * w + (x - pos + w)));
                    }
                }
                for x in pos..w {
                    for y in 0..h {
                        self.set(x, y, tr.to_at(y * w + (x - pos)));
                    }
                }
            }
            TransitionStyle::PushUp => {
                let pos = ((0xFFFF - progress) * h as u32 / 0xFFFF) as i32;
                for x in 0..w {
                    for y in 0..pos {
                        self.set(x, y, tr.from_at((y - pos + h) * w + x));
                    }
                    for y in pos..h {
                        self.set(x, y, tr.to_at((y - pos) * w + x));
                    }
                }
            }
            TransitionStyle::PushDown => {
                let pos = (progress * h as u32 / 0xFFFF) as i32;
                for x in 0..w {
                    for y in pos..h {
                        self.set(x, y, tr.from_at((y - pos) * w + x));
                    }
                    for y in 0..pos {
                        self.set(x, y, tr.to_at((y - pos + h) * w + x));
                    }
                }
            }
            style => {
                // Aligned styles: both snapshots share the segment's own
                // coordinate space, each pixel picks a side (or blends).
                for x in 0..w {
                    for y in 0..h {
                        let i = y * w + x;
                        let color = match style {
                            TransitionStyle::SwipeRight => {
                                let threshold = (x as u32 * 0xFFFF) / w as u32;
                                pick(&tr, progress, threshold, i)
                            }
                            TransitionStyle::SwipeLeft => {
                                let threshold = 0xFFFF - (x as u32 * 0xFFFF) / w as u32;
                                pick(&tr, progress, threshold, i)
                            }
                            TransitionStyle::SwipeUp => {
                                let threshold = 0xFFFF - (y as u32 * 0xFFFF) / h as u32;
                                pick(&tr, progress, threshold, i)
                            }
                            TransitionStyle::SwipeDown => {
                                let threshold = (y as u32 * 0xFFFF) / h as u32;
                                pick(&tr, progress, threshold, i)
                            }
                            TransitionStyle::OutsideIn => {
                                let half = (w / 2).max(1) as u32;
                                let edge = (if x < w / 2 { x } else { w - x }) as u32;
                                pick(&tr, progress, edge * 0xFFFF / half, i)
                            }
                            TransitionStyle::InsideOut => {
                                let half = (w / 2).max(1) as u32;
                                let edge = (if x < w / 2 { x } else { w - x }) as u32;
                                pick(&tr, progress, 0xFFFF - edge * 0xFFFF / half, i)
                            }
                            TransitionStyle::Dissolve => {
                                let len = (w * h) as u32;
                                let shuffled = hash_index(i as u32) % len;
                                pick(&tr, progress, shuffled * 0xFFFF / len, i)
                            }
                            _ => tr
                                .to_at(i)
                                .blend16(tr.from_at(i), 0xFFFF - progress as u16),
                        };
                        self.set(x, y, color);
                    }
                }
            }
        }

        self.seg.transition = Some(tr);
    }
}

/// Outgoing frame while progress has not passed the pixel's threshold.
#[inline]
fn pick(tr: &Transition, progress: u32, threshold: u32, index: i32) -> PackedRgbw {
    if progress <= threshold {
        tr.from_at(index)
    } else {
        tr.to_at(index)
    }
}
