#![forbid(unsafe_code)]

//! Gap masks.
//!
//! A gap mask marks cells of the matrix bounding rectangle as missing,
//! inactive, or active while the logical map is built. The file format is a
//! raw JSON integer array (`[1,1,-1,0,...]`) with no other structure. The
//! mask only exists during map construction; nothing retains it afterwards.
//!
//! Malformed or undersized data is never an error: the mapper falls back to
//! treating every cell as active.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;

/// State of one bounding-rectangle cell during map construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapState {
    /// No LED is attached here; the cell does not consume a physical index.
    Missing,
    /// An LED occupies this physical slot but is left out of the logical
    /// map (an unaddressable diode still counts toward strip length).
    Inactive,
    /// Mapped normally.
    Active,
}

impl GapState {
    /// Interpret a raw file value. Values are clamped to `-1..=1`.
    #[inline]
    const fn from_raw(value: i64) -> Self {
        if value < 0 {
            Self::Missing
        } else if value == 0 {
            Self::Inactive
        } else {
            Self::Active
        }
    }
}

/// A flat per-cell mask covering the matrix bounding rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapMask {
    cells: Vec<GapState>,
}

// Gap files are read through one shared scratch buffer; the guard is scoped
// to the read + parse and released on every exit path.
static SCRATCH: Mutex<String> = Mutex::new(String::new());

impl GapMask {
    /// Parse a raw JSON integer array.
    ///
    /// Returns `None` for anything that is not a plain integer array; the
    /// caller then proceeds with the full-active default.
    pub fn from_json_str(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Vec<i64>>(raw) {
            Ok(values) => Some(Self {
                cells: values.into_iter().map(GapState::from_raw).collect(),
            }),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "gap mask is not a flat integer array, ignoring");
                None
            }
        }
    }

    /// Read and parse a gap file.
    ///
    /// A missing or unreadable file yields `None` (full-active default).
    pub fn load(path: &Path) -> Option<Self> {
        let mut buf = SCRATCH.lock().unwrap_or_else(|e| e.into_inner());
        buf.clear();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %path.display(), "no gap file");
                return None;
            }
        };
        if let Err(_err) = file.read_to_string(&mut buf) {
            #[cfg(feature = "tracing")]
            tracing::warn!(path = %path.display(), error = %_err, "gap file unreadable, ignoring");
            return None;
        }
        Self::from_json_str(&buf)
    }

    /// Number of cells in the mask.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the mask holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State of the cell at a flat bounding-rectangle index.
    ///
    /// Indices past the end read as `Active`; the mapper only consults
    /// masks at least as large as the bounding rectangle.
    #[inline]
    pub fn state(&self, index: usize) -> GapState {
        self.cells.get(index).copied().unwrap_or(GapState::Active)
    }
}
