//! Depth image synthesis pipeline.
//!
//! Turns a depth CSV into a colour-mapped PNG:
//!
//! ```text
//! CSV file
//!    │
//!    ▼
//! load_csv ──────────► DepthDataset (raw f64, NaN for empty cells)
//!    │
//!    ▼
//! sanitize ──────────► non-finite → 0.0, row count unchanged
//!    │
//!    ▼
//! filter_depth ──────► rows with min <= depth <= max   (only with both bounds)
//!    │
//!    ▼
//! project ───────────► SampleMatrix (u8, depth column dropped)
//!    │
//!    ▼
//! resize_columns ────► exactly `width` columns         (only with a width)
//!    │
//!    ▼
//! Rasterizer ────────► RGBA raster, optionally stretched to a canvas
//!    │
//!    ▼
//! encode_raster ─────► PNG bytes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pipeline::{synthesize, SynthesisRequest};
//! use depth_common::DepthRange;
//!
//! let request = SynthesisRequest::default().with_depth_range(DepthRange::new(4.0, 10.0));
//! let png = synthesize("data/data.csv", &request)?;
//! ```

pub mod loader;
pub mod synthesis;
pub mod transform;

pub use loader::{load_csv, load_csv_reader};
pub use synthesis::{render, synthesize, synthesize_with, SynthesisRequest, NO_DATA_MESSAGE};
pub use transform::{filter_depth, project, sanitize};
