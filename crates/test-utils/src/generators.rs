//! Generators for synthetic depth CSV content.
//!
//! Values are predictable so tests can check exactly which rows survived a
//! filter or how a resize moved them.

/// Header line for a depth table with `cols` sample columns: `depth,s0,s1,...`.
pub fn csv_header(cols: usize) -> String {
    std::iter::once("depth".to_string())
        .chain((0..cols).map(|c| format!("s{}", c)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build CSV text from explicit depths and a value function `f(row, col)`.
///
/// # Example
///
/// ```
/// use test_utils::depth_csv;
///
/// let csv = depth_csv(&[1.0, 2.5], 2, |r, c| (r * 10 + c) as f64);
/// assert_eq!(csv, "depth,s0,s1\n1,0,1\n2.5,10,11\n");
/// ```
pub fn depth_csv(depths: &[f64], cols: usize, f: impl Fn(usize, usize) -> f64) -> String {
    let mut out = csv_header(cols);
    out.push('\n');
    for (row, depth) in depths.iter().enumerate() {
        out.push_str(&depth.to_string());
        for col in 0..cols {
            out.push(',');
            out.push_str(&f(row, col).to_string());
        }
        out.push('\n');
    }
    out
}

/// Evenly spaced depths starting at `start`.
pub fn linear_depths(rows: usize, start: f64, step: f64) -> Vec<f64> {
    (0..rows).map(|i| start + i as f64 * step).collect()
}

/// A sonar-like table: `rows` depths from 100.0 in 0.5 steps, sample value
/// `(row * 3 + col * 7) % 256` so every cell is a valid byte.
pub fn create_depth_table(rows: usize, cols: usize) -> String {
    depth_csv(&linear_depths(rows, 100.0, 0.5), cols, |r, c| ((r * 3 + c * 7) % 256) as f64)
}
