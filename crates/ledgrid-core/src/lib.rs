#![forbid(unsafe_code)]

//! Core: packed RGBW color and grid geometry.

pub mod color;
pub mod geometry;
