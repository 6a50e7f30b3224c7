//! Pure dataset transformations: sanitize, filter, project.

use depth_common::{DepthDataset, DepthError, DepthRange, DepthResult, DepthRow, SampleMatrix};

use crate::synthesis::NO_DATA_MESSAGE;

/// Replace every non-finite value (±inf, NaN) with 0.0, depth included.
///
/// Row count and order are unchanged, so depths stay aligned with their
/// samples. Must run before [`filter_depth`].
pub fn sanitize(dataset: DepthDataset) -> DepthDataset {
    let rows = dataset
        .rows
        .into_iter()
        .map(|row| DepthRow {
            depth: finite_or_zero(row.depth),
            samples: row.samples.into_iter().map(finite_or_zero).collect(),
        })
        .collect();
    DepthDataset::new(dataset.header, rows)
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Keep rows whose depth lies in the inclusive `range`.
///
/// Fails with [`DepthError::NoData`] when nothing matches.
pub fn filter_depth(dataset: DepthDataset, range: DepthRange) -> DepthResult<DepthDataset> {
    let rows: Vec<DepthRow> = dataset
        .rows
        .into_iter()
        .filter(|row| range.contains(row.depth))
        .collect();

    if rows.is_empty() {
        return Err(DepthError::NoData(NO_DATA_MESSAGE.to_string()));
    }
    Ok(DepthDataset::new(dataset.header, rows))
}

/// Drop the depth column and cast samples to bytes.
///
/// The cast truncates toward zero and saturates: negatives become 0,
/// anything above 255 becomes 255.
pub fn project(dataset: &DepthDataset) -> DepthResult<SampleMatrix> {
    let cols = dataset.sample_columns();
    let mut data = Vec::with_capacity(dataset.len() * cols);
    for (i, row) in dataset.rows.iter().enumerate() {
        if row.samples.len() != cols {
            return Err(DepthError::DataFormat(format!(
                "row {} has {} samples, expected {}",
                i,
                row.samples.len(),
                cols
            )));
        }
        data.extend(row.samples.iter().map(|&v| v as u8));
    }

    SampleMatrix::from_vec(dataset.len(), cols, data)
        .ok_or_else(|| DepthError::Internal("projected matrix has wrong shape".to_string()))
}
