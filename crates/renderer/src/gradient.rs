//! Resampling and colour-mapping of sample matrices.

use rayon::prelude::*;

use depth_common::{DepthError, DepthResult, SampleMatrix};

use crate::colormap::{Palette, LUT_SIZE};
use crate::raster::Raster;

/// Gaussian kernels are cut off at this many standard deviations.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Resize the column axis of a matrix to exactly `width` columns.
///
/// Rows are never touched. Sampling is bilinear with pixel centres aligned
/// (`src = (dst + 0.5) * scale - 0.5`) and mirrored borders. When shrinking,
/// each row is first smoothed with a Gaussian of
/// `sigma = (scale - 1) / 2` to suppress aliasing. Interpolated values are
/// truncated back to `u8`.
pub fn resize_columns(matrix: &SampleMatrix, width: usize) -> DepthResult<SampleMatrix> {
    if width == 0 {
        return Err(DepthError::InvalidParameter {
            param: "width".to_string(),
            message: "target width must be at least 1".to_string(),
        });
    }

    let src_cols = matrix.cols();
    if src_cols == 0 {
        return Err(DepthError::Render(
            "cannot resize a matrix with no columns".to_string(),
        ));
    }

    let scale = src_cols as f64 / width as f64;
    let sigma = ((scale - 1.0) / 2.0).max(0.0);
    let kernel = gaussian_kernel(sigma);

    let mut out = vec![0u8; matrix.rows() * width];
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(row_idx, out_row)| {
            let row: Vec<f64> = matrix.row(row_idx).iter().map(|&v| v as f64).collect();
            let smoothed = match &kernel {
                Some(k) => convolve_mirror(&row, k),
                None => row,
            };
            for (x, px) in out_row.iter_mut().enumerate() {
                let src_x = (x as f64 + 0.5) * scale - 0.5;
                *px = truncate_u8(sample_linear(&smoothed, src_x));
            }
        });

    SampleMatrix::from_vec(matrix.rows(), width, out)
        .ok_or_else(|| DepthError::Render("resized buffer has wrong shape".to_string()))
}

/// Normalized 1-D Gaussian kernel, or `None` when no smoothing is needed.
pub fn gaussian_kernel(sigma: f64) -> Option<Vec<f64>> {
    if sigma <= 0.0 {
        return None;
    }
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let coeff = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (coeff * (x * x) as f64).exp())
        .collect();
    let sum = pairwise_sum(&kernel);
    for w in &mut kernel {
        *w /= sum;
    }
    Some(kernel)
}

/// Blocked pairwise summation with the same rounding as numpy's `sum`: eight
/// running partials up to 128 elements, recursive halving above.
fn pairwise_sum(values: &[f64]) -> f64 {
    const BLOCK: usize = 128;
    let n = values.len();
    if n < 8 {
        values.iter().fold(0.0, |acc, v| acc + v)
    } else if n <= BLOCK {
        let mut r = [0.0f64; 8];
        r.copy_from_slice(&values[..8]);
        let mut i = 8;
        while i + 8 <= n {
            for (j, acc) in r.iter_mut().enumerate() {
                *acc += values[i + j];
            }
            i += 8;
        }
        let mut sum = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for v in &values[i..] {
            sum += v;
        }
        sum
    } else {
        let mut half = n / 2;
        half -= half % 8;
        pairwise_sum(&values[..half]) + pairwise_sum(&values[half..])
    }
}

/// Correlate with a symmetric kernel, mirroring at the edges (`d c b | a b c d | c b a`).
///
/// Taps are accumulated centre first, then in mirrored pairs from the outside in.
fn convolve_mirror(row: &[f64], kernel: &[f64]) -> Vec<f64> {
    let radius = kernel.len() / 2;
    let n = row.len();
    (0..n as isize)
        .map(|i| {
            let mut acc = row[i as usize] * kernel[radius];
            for j in (1..=radius).rev() {
                let left = row[mirror_index(i - j as isize, n)];
                let right = row[mirror_index(i + j as isize, n)];
                acc += (left + right) * kernel[radius + j];
            }
            acc
        })
        .collect()
}

/// Linear interpolation at a fractional index with mirrored borders.
fn sample_linear(row: &[f64], x: f64) -> f64 {
    let x0 = x.floor();
    let frac = x - x0;
    let i0 = x0 as isize;
    let a = row[mirror_index(i0, row.len())];
    let b = row[mirror_index(i0 + 1, row.len())];
    a * (1.0 - frac) + b * frac
}

fn mirror_index(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let i = i.rem_euclid(period);
    if i >= n as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

#[inline]
fn truncate_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Colour-map a matrix into an opaque RGBA raster of the same shape.
///
/// Values are normalized against the matrix's own min/max; a constant matrix
/// maps entirely to the low end of the palette.
pub fn render_matrix(matrix: &SampleMatrix, palette: &Palette) -> DepthResult<Raster> {
    let (min_val, max_val) = matrix
        .value_range()
        .ok_or_else(|| DepthError::Render("cannot render an empty matrix".to_string()))?;

    let lut = palette.lut();
    let range = (max_val - min_val) as f32;

    let mut pixels = vec![0u8; matrix.rows() * matrix.cols() * 4];
    for (value, pixel) in matrix.as_slice().iter().zip(pixels.chunks_exact_mut(4)) {
        let normalized = if range > 0.0 {
            (*value - min_val) as f32 / range
        } else {
            0.0
        };
        let idx = ((normalized * LUT_SIZE as f32) as usize).min(LUT_SIZE - 1);
        pixel.copy_from_slice(&lut[idx].to_array());
    }

    Raster::from_pixels(matrix.cols(), matrix.rows(), pixels)
}
