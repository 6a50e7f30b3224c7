//! CSV loading for depth tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use depth_common::{DepthDataset, DepthError, DepthResult, DepthRow};

/// Required name of the first column.
pub const DEPTH_COLUMN: &str = "depth";

/// Cell spellings read as a missing value (NaN), compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "#n/a", "<na>", "null", "none", "-nan"];

/// Read the whole CSV at `path` into a dataset.
///
/// The first column must be named `depth`; every other column is a sample. Values are
/// left raw: empty cells become NaN and `inf`/`-inf` stay infinite until
/// [`crate::sanitize`] runs.
pub fn load_csv(path: impl AsRef<Path>) -> DepthResult<DepthDataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| DepthError::DataFormat(format!("cannot open {}: {}", path.display(), e)))?;
    let dataset = load_csv_reader(file)?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        sample_columns = dataset.sample_columns(),
        depth_extent = ?dataset.depth_extent(),
        "Loaded depth table"
    );
    Ok(dataset)
}

/// Same as [`load_csv`] for any reader.
pub fn load_csv_reader<R: Read>(reader: R) -> DepthResult<DepthDataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if header.len() < 2 {
        return Err(DepthError::DataFormat(format!(
            "expected a depth column and at least one sample column, found {} column(s)",
            header.len()
        )));
    }
    if !header[0].eq_ignore_ascii_case(DEPTH_COLUMN) {
        return Err(DepthError::DataFormat(format!(
            "first column must be '{}', found '{}'",
            DEPTH_COLUMN, header[0]
        )));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        // Ragged rows surface here as csv::Error (UnequalLengths)
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut values = record
            .iter()
            .enumerate()
            .map(|(col, field)| parse_cell(field).ok_or_else(|| {
                DepthError::DataFormat(format!(
                    "line {}, column '{}': '{}' is not a number",
                    line, header[col], field
                ))
            }));

        let depth = match values.next() {
            Some(v) => v?,
            None => continue,
        };
        let samples = values.collect::<DepthResult<Vec<f64>>>()?;
        rows.push(DepthRow::new(depth, samples));
    }

    Ok(DepthDataset::new(header, rows))
}

/// Parse one cell; missing markers become NaN. `None` for non-numeric text.
fn parse_cell(field: &str) -> Option<f64> {
    if MISSING_MARKERS.iter().any(|m| field.eq_ignore_ascii_case(m)) {
        return Some(f64::NAN);
    }
    field.parse::<f64>().ok()
}
