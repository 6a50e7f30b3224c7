//! Common types and utilities shared across the depth-image crates.

pub mod dataset;
pub mod error;
pub mod matrix;
pub mod range;

pub use dataset::{DepthDataset, DepthRow};
pub use error::{DepthError, DepthResult};
pub use matrix::SampleMatrix;
pub use range::DepthRange;
