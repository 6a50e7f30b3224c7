//! Error types for depth-image services.

use thiserror::Error;

/// Result type alias using DepthError.
pub type DepthResult<T> = Result<T, DepthError>;

/// Primary error type for depth image operations.
#[derive(Debug, Error)]
pub enum DepthError {
    // === Request Errors ===
    #[error("{0} is required")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown colormap: {0}")]
    UnknownPalette(String),

    // === Data Errors ===
    /// Filtering left nothing to render. The message is safe to show callers.
    #[error("{0}")]
    NoData(String),

    #[error("Failed to read depth data: {0}")]
    DataFormat(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    Database(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DepthError {
    /// Whether the caller can be shown this error as-is.
    ///
    /// Only an empty depth selection qualifies; everything else is an
    /// unexpected failure that gets logged and reported generically.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DepthError::NoData(_))
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DepthError::InvalidParameter { .. } | DepthError::UnknownPalette(_) => 400,

            DepthError::NoData(_) => 404,

            DepthError::MissingParameter(_) => 422,

            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for DepthError {
    fn from(err: std::io::Error) -> Self {
        DepthError::DataFormat(err.to_string())
    }
}

impl From<csv::Error> for DepthError {
    fn from(err: csv::Error) -> Self {
        DepthError::DataFormat(err.to_string())
    }
}
