//! Row-major 8-bit sample grid handed to the renderer.

/// Sample values with the depth column dropped, `rows x cols`, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl SampleMatrix {
    /// Wrap an existing buffer. Returns `None` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Borrow a single row.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Smallest and largest value, or `None` when the matrix is empty.
    pub fn value_range(&self) -> Option<(u8, u8)> {
        let min = *self.data.iter().min()?;
        let max = *self.data.iter().max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_shape() {
        assert!(SampleMatrix::from_vec(2, 3, vec![0; 6]).is_some());
        assert!(SampleMatrix::from_vec(2, 3, vec![0; 5]).is_none());
    }

    #[test]
    fn test_indexing() {
        let m = SampleMatrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.row(0), &[1, 2, 3]);
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.as_slice().len(), 6);
        assert_eq!(m.value_range(), Some((1, 6)));
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(SampleMatrix::zeros(0, 4).value_range(), None);
    }
}
