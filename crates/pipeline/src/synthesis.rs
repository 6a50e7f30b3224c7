//! End-to-end synthesis: depth CSV in, PNG bytes out.

use std::path::Path;
use std::time::Instant;

use tracing::{error, info};

use depth_common::{DepthDataset, DepthError, DepthRange, DepthResult};
use renderer::gradient::resize_columns;
use renderer::png::encode_raster;
use renderer::{CanvasSize, Palette, PaletteRasterizer, Raster, Rasterizer};

use crate::loader::load_csv;
use crate::transform::{filter_depth, project, sanitize};

/// Message carried by [`DepthError::NoData`] when nothing is left to draw.
pub const NO_DATA_MESSAGE: &str = "No data available for the specified depth range.";

/// Options for one synthesis run. The default renders the full table at
/// native size with the `magma` palette.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SynthesisRequest {
    /// Resize the column axis to this many columns
    pub width: Option<usize>,
    /// Keep only rows inside this depth interval
    pub depth_range: Option<DepthRange>,
    pub palette: Palette,
    /// Stretch the raster onto a fixed output size
    pub canvas: Option<CanvasSize>,
}

impl SynthesisRequest {
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_depth_range(mut self, range: DepthRange) -> Self {
        self.depth_range = Some(range);
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasSize) -> Self {
        self.canvas = Some(canvas);
        self
    }
}

/// Run sanitize → filter → project → resize → rasterize on a loaded dataset.
pub fn render<R: Rasterizer + ?Sized>(
    dataset: DepthDataset,
    request: &SynthesisRequest,
    rasterizer: &R,
) -> DepthResult<Raster> {
    let dataset = sanitize(dataset);

    // An empty filter result is NoData; an empty source is a broken dataset.
    let dataset = match request.depth_range {
        Some(range) => filter_depth(dataset, range)?,
        None if dataset.is_empty() => {
            return Err(DepthError::DataFormat(
                "depth table has no data rows".to_string(),
            ));
        }
        None => dataset,
    };

    let matrix = project(&dataset)?;
    let matrix = match request.width {
        Some(width) => resize_columns(&matrix, width)?,
        None => matrix,
    };

    let raster = rasterizer.rasterize(&matrix, &request.palette)?;
    match request.canvas {
        Some(canvas) => raster.stretch(canvas),
        None => Ok(raster),
    }
}

/// Load the CSV at `source` and produce PNG bytes with the palette rasterizer.
pub fn synthesize(source: impl AsRef<Path>, request: &SynthesisRequest) -> DepthResult<Vec<u8>> {
    synthesize_with(source, request, &PaletteRasterizer)
}

/// [`synthesize`] with a caller-supplied rasterizer.
pub fn synthesize_with<R: Rasterizer + ?Sized>(
    source: impl AsRef<Path>,
    request: &SynthesisRequest,
    rasterizer: &R,
) -> DepthResult<Vec<u8>> {
    let source = source.as_ref();
    let start = Instant::now();

    let result = load_csv(source)
        .and_then(|dataset| render(dataset, request, rasterizer))
        .and_then(encode_raster);

    match &result {
        Ok(png) => info!(
            source = %source.display(),
            width = ?request.width,
            depth_range = ?request.depth_range,
            palette = %request.palette,
            bytes = png.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Image generated successfully"
        ),
        Err(e) if e.is_recoverable() => info!(
            source = %source.display(),
            depth_range = ?request.depth_range,
            "{}", e
        ),
        Err(e) => error!(
            source = %source.display(),
            error = %e,
            "Error generating image"
        ),
    }

    result
}
