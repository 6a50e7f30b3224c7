//! Tabular depth measurements as loaded from the source file.

/// One row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthRow {
    /// Depth of this sample row
    pub depth: f64,
    /// Ordered sample values, one per sample column
    pub samples: Vec<f64>,
}

impl DepthRow {
    pub fn new(depth: f64, samples: Vec<f64>) -> Self {
        Self { depth, samples }
    }
}

/// A depth column plus N ordered sample columns.
///
/// Every row carries the same number of samples; the loader rejects ragged
/// input before a dataset is ever built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthDataset {
    /// Column names, depth column first
    pub header: Vec<String>,
    pub rows: Vec<DepthRow>,
}

impl DepthDataset {
    pub fn new(header: Vec<String>, rows: Vec<DepthRow>) -> Self {
        Self { header, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of sample columns (every column except depth).
    pub fn sample_columns(&self) -> usize {
        match self.rows.first() {
            Some(row) => row.samples.len(),
            None => self.header.len().saturating_sub(1),
        }
    }

    /// Depth values in row order.
    pub fn depths(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.depth)
    }

    /// Smallest and largest depth, or `None` for an empty dataset.
    pub fn depth_extent(&self) -> Option<(f64, f64)> {
        let mut depths = self.depths();
        let first = depths.next()?;
        Some(depths.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
