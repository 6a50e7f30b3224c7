//! HTTP handlers for the image, health and metrics routes.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use depth_common::{DepthError, DepthRange, DepthResult};
use pipeline::{synthesize, SynthesisRequest};
use renderer::Palette;
use storage::resized_description;

use crate::metrics;
use crate::state::AppState;

/// Detail returned for every 5xx response. The real cause is only logged.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Detail returned when the resized image was never stored.
pub const RESIZED_NOT_FOUND_DETAIL: &str = "Resized image not found in DB.";

// ============================================================================
// Errors
// ============================================================================

/// A [`DepthError`] rendered as `{"detail": ...}` with its HTTP status.
#[derive(Debug)]
pub struct ApiError(pub DepthError);

impl From<DepthError> for ApiError {
    fn from(err: DepthError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = if status.is_server_error() {
            INTERNAL_ERROR_DETAIL.to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub colormap: Option<String>,
}

/// Bounds are kept as text so a missing value can be told apart from a
/// malformed one.
#[derive(Debug, Default, Deserialize)]
pub struct DepthRangeQuery {
    pub depth_min: Option<String>,
    pub depth_max: Option<String>,
    pub colormap: Option<String>,
}

impl DepthRangeQuery {
    pub fn range(&self) -> DepthResult<DepthRange> {
        let min = parse_bound("depth_min", self.depth_min.as_deref())?;
        let max = parse_bound("depth_max", self.depth_max.as_deref())?;
        Ok(DepthRange::new(min, max))
    }
}

fn parse_bound(param: &str, raw: Option<&str>) -> DepthResult<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DepthError::MissingParameter(param.to_string()))?;
    raw.parse::<f64>().map_err(|_| DepthError::InvalidParameter {
        param: param.to_string(),
        message: format!("'{}' is not a number", raw),
    })
}

fn parse_palette(colormap: Option<&str>) -> DepthResult<Option<Palette>> {
    colormap.map(str::parse::<Palette>).transpose()
}

/// Format a bound the way it appears in download filenames: integral values
/// keep one decimal (`4.0`), others print as-is (`4.25`).
pub fn format_bound(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Run the pipeline on the blocking pool, recording metrics for `route`.
async fn render_png(
    state: &AppState,
    route: &'static str,
    request: SynthesisRequest,
) -> Result<Vec<u8>, ApiError> {
    metrics::record_image_request(route);

    let source = state.config.data_csv_path.clone();
    let start = Instant::now();
    // The pipeline logs its own failures; only a lost task is logged here.
    let result = match tokio::task::spawn_blocking(move || synthesize(&source, &request)).await {
        Ok(result) => result,
        Err(e) => {
            error!(route, error = %e, "Synthesis task failed");
            Err(DepthError::Internal(format!("synthesis task failed: {}", e)))
        }
    };
    metrics::record_synthesis_duration(route, start.elapsed());

    result.map_err(|e| {
        if !e.is_recoverable() {
            metrics::record_render_error(route);
        }
        ApiError(e)
    })
}

/// Fetch the cached resized image or fail with a 404.
async fn cached_resized_png(state: &AppState) -> Result<Vec<u8>, ApiError> {
    metrics::record_image_request("resized");

    let description = resized_description(state.config.resized_width);
    match state.cache.lookup(&description).await {
        Ok(Some(image)) => {
            metrics::record_resized_cache_hit();
            Ok(image.image_blob)
        }
        Ok(None) => {
            metrics::record_resized_cache_miss();
            warn!(description = %description, "Resized image requested but not cached");
            Err(DepthError::NoData(RESIZED_NOT_FOUND_DETAIL.to_string()).into())
        }
        Err(e) => {
            error!(description = %description, error = %e, "Image cache lookup failed");
            Err(e.into())
        }
    }
}

fn png_response(png: Vec<u8>, attachment: Option<&str>) -> Response {
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        png,
    )
        .into_response();

    if let Some(filename) = attachment {
        let disposition = format!("attachment; filename=\"{}\"", filename);
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

// ============================================================================
// Image routes
// ============================================================================

/// GET /original-image
#[instrument(skip(state))]
pub async fn original_image_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let palette = parse_palette(query.colormap.as_deref())?;
    let png = render_png(&state, "original", state.request(palette)).await?;
    Ok(png_response(png, None))
}

/// GET /resized-image
#[instrument(skip(state))]
pub async fn resized_image_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let png = cached_resized_png(&state).await?;
    Ok(png_response(png, None))
}

/// GET /depth-range-image?depth_min=..&depth_max=..
#[instrument(skip(state))]
pub async fn depth_range_image_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<DepthRangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range()?;
    let palette = parse_palette(query.colormap.as_deref())?;
    let request = state.request(palette).with_depth_range(range);

    let png = render_png(&state, "depth_range", request).await?;
    info!(depth_range = %range, bytes = png.len(), "Served depth-range image");
    Ok(png_response(png, None))
}

// ============================================================================
// Download routes
// ============================================================================

/// GET /download-original
#[instrument(skip(state))]
pub async fn download_original_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let palette = parse_palette(query.colormap.as_deref())?;
    let png = render_png(&state, "download_original", state.request(palette)).await?;
    Ok(png_response(png, Some("original_image.png")))
}

/// GET /download-resized
#[instrument(skip(state))]
pub async fn download_resized_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let png = cached_resized_png(&state).await?;
    let filename = format!("resized_image_w{}.png", state.config.resized_width);
    Ok(png_response(png, Some(&filename)))
}

/// GET /download-depth-range?depth_min=..&depth_max=..
#[instrument(skip(state))]
pub async fn download_depth_range_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<DepthRangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range()?;
    let palette = parse_palette(query.colormap.as_deref())?;
    let request = state.request(palette).with_depth_range(range);

    let png = render_png(&state, "download_depth_range", request).await?;
    let filename = format!(
        "depth_range_{}_to_{}.png",
        format_bound(range.min),
        format_bound(range.max)
    );
    Ok(png_response(png, Some(&filename)))
}

// ============================================================================
// Health and metrics
// ============================================================================

/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        state.prometheus.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(4.0), "4.0");
        assert_eq!(format_bound(-10.0), "-10.0");
        assert_eq!(format_bound(4.25), "4.25");
    }

    #[test]
    fn test_parse_bound_missing_is_422() {
        let err = parse_bound("depth_min", None).unwrap_err();
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.to_string(), "depth_min is required");

        let err = parse_bound("depth_max", Some("  ")).unwrap_err();
        assert!(matches!(err, DepthError::MissingParameter(ref p) if p == "depth_max"));
    }

    #[test]
    fn test_parse_bound_malformed_is_400() {
        let err = parse_bound("depth_min", Some("deep")).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_range_from_query() {
        let query = DepthRangeQuery {
            depth_min: Some("4".to_string()),
            depth_max: Some(" 10.5 ".to_string()),
            colormap: None,
        };
        assert_eq!(query.range().unwrap(), DepthRange::new(4.0, 10.5));
    }

    #[test]
    fn test_parse_palette() {
        assert_eq!(parse_palette(None).unwrap(), None);
        assert!(parse_palette(Some("viridis")).unwrap().is_some());
        assert!(matches!(
            parse_palette(Some("nope")),
            Err(DepthError::UnknownPalette(_))
        ));
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = ApiError(DepthError::Database("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(DepthError::NoData("nothing".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
