//! The matrix-to-raster step as a swappable capability.

use depth_common::{DepthResult, SampleMatrix};

use crate::colormap::Palette;
use crate::gradient::render_matrix;
use crate::raster::Raster;

/// Turns a sample matrix into pixels.
///
/// The pipeline only depends on this trait, so filtering and resizing can be
/// exercised with a recording or stub backend.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, matrix: &SampleMatrix, palette: &Palette) -> DepthResult<Raster>;
}

/// Colour-maps each value through a palette lookup table, one pixel per value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteRasterizer;

impl Rasterizer for PaletteRasterizer {
    fn rasterize(&self, matrix: &SampleMatrix, palette: &Palette) -> DepthResult<Raster> {
        render_matrix(matrix, palette)
    }
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn rasterize(&self, matrix: &SampleMatrix, palette: &Palette) -> DepthResult<Raster> {
        (**self).rasterize(matrix, palette)
    }
}
