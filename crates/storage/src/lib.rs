//! Storage for depth-image services.
//!
//! Holds the SQLite table of pre-rendered images, keyed by a textual
//! description such as `resized_150`.

pub mod image_cache;

pub use image_cache::{resized_description, CachedImage, ImageCache};
