//! Image rendering for depth sample matrices.
//!
//! Implements:
//! - Named colour palettes (`colormap`)
//! - Anti-aliased column resizing (`gradient`)
//! - RGBA rasters with trimming and canvas stretch (`raster`)
//! - The pluggable matrix-to-raster step (`rasterizer`)
//! - PNG encoding (`png`)

pub mod colormap;
pub mod gradient;
pub mod png;
pub mod raster;
pub mod rasterizer;

pub use colormap::{Color, ColorMap, Palette};
pub use raster::{CanvasSize, Raster};
pub use rasterizer::{PaletteRasterizer, Rasterizer};
