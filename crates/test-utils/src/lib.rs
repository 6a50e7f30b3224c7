//! Shared test helpers for the depth-image workspace.
//!
//! - `generators`: synthetic depth CSV text with predictable values
//! - `fixtures`: small hand-written CSVs and temp-file writers
//! - `paths`: locating the workspace and its sample dataset
//! - `logging`: counting error events emitted during a test
//!
//! Pull it in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use logging::ErrorCounter;
pub use paths::*;
