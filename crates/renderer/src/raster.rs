//! RGBA raster buffers.

use depth_common::{DepthError, DepthResult};

/// Fixed output size a raster is stretched onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: usize,
    pub height: usize,
}

impl CanvasSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Row-major RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> DepthResult<Self> {
        if width * height * 4 != pixels.len() {
            return Err(DepthError::Render(format!(
                "pixel buffer of {} bytes does not match {}x{} RGBA",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Tightest bounding box `(x0, y0, x1, y1)` (exclusive ends) around
    /// pixels with non-zero alpha. `None` if everything is transparent.
    pub fn content_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixels[(y * self.width + x) * 4 + 3] == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x + 1, y + 1),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                });
            }
        }
        bounds
    }

    /// Crop transparent padding. A fully transparent raster is returned unchanged.
    pub fn trim_transparent(self) -> Raster {
        let Some((x0, y0, x1, y1)) = self.content_bounds() else {
            return self;
        };
        if (x0, y0, x1, y1) == (0, 0, self.width, self.height) {
            return self;
        }

        let width = x1 - x0;
        let height = y1 - y0;
        let mut pixels = Vec::with_capacity(width * height * 4);
        for y in y0..y1 {
            let start = (y * self.width + x0) * 4;
            pixels.extend_from_slice(&self.pixels[start..start + width * 4]);
        }
        Raster { width, height, pixels }
    }

    /// Nearest-neighbour stretch onto a canvas. Aspect ratio is not preserved.
    pub fn stretch(&self, canvas: CanvasSize) -> DepthResult<Raster> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(DepthError::InvalidParameter {
                param: "canvas".to_string(),
                message: format!("{}x{} has no area", canvas.width, canvas.height),
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(DepthError::Render("cannot stretch an empty raster".to_string()));
        }
        if canvas.width == self.width && canvas.height == self.height {
            return Ok(self.clone());
        }

        let x_map: Vec<usize> = (0..canvas.width)
            .map(|x| nearest_source(x, self.width, canvas.width))
            .collect();

        let mut pixels = Vec::with_capacity(canvas.width * canvas.height * 4);
        for y in 0..canvas.height {
            let src_y = nearest_source(y, self.height, canvas.height);
            for &src_x in &x_map {
                pixels.extend_from_slice(&self.pixel(src_x, src_y));
            }
        }
        Raster::from_pixels(canvas.width, canvas.height, pixels)
    }
}

#[inline]
fn nearest_source(dst: usize, src_len: usize, dst_len: usize) -> usize {
    (((dst as f64 + 0.5) * src_len as f64 / dst_len as f64) as usize).min(src_len - 1)
}
