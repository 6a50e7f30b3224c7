//! In-process tests of the HTTP surface.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use depth_api::{build_router, startup::populate_resized_cache, AppState, Config};
use test_utils::{create_depth_table, write_csv_in, ErrorCounter, EMPTY_CSV, THREE_ROW_CSV};
use tracing_subscriber::layer::SubscriberExt;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    _dir: tempfile::TempDir,
    state: Arc<AppState>,
}

impl TestApp {
    async fn with_csv(csv: Option<&str>, extra_args: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = match csv {
            Some(contents) => write_csv_in(dir.path(), "data.csv", contents),
            None => dir.path().join("missing.csv"),
        };
        let state = Arc::new(build_state(dir.path(), &csv_path, extra_args).await);
        Self { _dir: dir, state }
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }
}

async fn build_state(dir: &Path, csv_path: &Path, extra_args: &[&str]) -> AppState {
    let database_url = format!("sqlite://{}", dir.join("test.db").display());
    let csv_path = csv_path.display().to_string();
    let mut argv = vec![
        "depth-api",
        "--database-url",
        &database_url,
        "--data-csv-path",
        &csv_path,
        "--canvas-width",
        "80",
        "--canvas-height",
        "60",
    ];
    argv.extend_from_slice(extra_args);
    let config = Config::try_parse_from(argv).unwrap();

    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    AppState::new(config, prometheus).await.unwrap()
}

fn detail(body: &[u8]) -> String {
    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    json["detail"].as_str().unwrap().to_string()
}

fn decoded_size(png: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory_with_format(png, image::ImageFormat::Png).unwrap();
    (img.width(), img.height())
}

// ============================================================================
// Original image
// ============================================================================

#[tokio::test]
async fn test_original_image_is_png_on_canvas() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, headers, body) = app.get("/original-image").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert!(headers.get(header::CONTENT_DISPOSITION).is_none());
    assert!(body.starts_with(PNG_SIGNATURE));
    assert_eq!(decoded_size(&body), (80, 60));
}

#[tokio::test]
async fn test_original_image_with_colormap() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (_, _, magma) = app.get("/original-image").await;
    let (status, _, gray) = app.get("/original-image?colormap=gray").await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(magma, gray);
}

#[tokio::test]
async fn test_unknown_colormap_is_400() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, _, body) = app.get("/original-image?colormap=sparkles").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("sparkles"));
}

#[tokio::test]
async fn test_missing_csv_is_generic_500() {
    let app = TestApp::with_csv(None, &[]).await;
    let (status, _, body) = app.get("/original-image").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(detail(&body), "Internal server error");
}

#[tokio::test]
async fn test_failed_render_is_not_logged_again_by_handler() {
    let app = TestApp::with_csv(None, &[]).await;
    let counter = ErrorCounter::new("depth_api");
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let (status, _, _) = app.get("/original-image").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // The pipeline reports the failure from the blocking pool.
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn test_header_only_csv_is_generic_500() {
    let app = TestApp::with_csv(Some(EMPTY_CSV), &[]).await;

    for uri in ["/original-image", "/download-original"] {
        let (status, _, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(detail(&body), "Internal server error");
    }

    // Filtering an empty table still reports an empty range.
    let (status, _, _) = app.get("/depth-range-image?depth_min=0&depth_max=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(!populate_resized_cache(&app.state).await);
    assert_eq!(app.state.cache.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_csv_without_depth_column_is_generic_500() {
    let app = TestApp::with_csv(Some("time,s0,s1\n1,2,3\n"), &[]).await;
    let (status, _, body) = app.get("/original-image").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(detail(&body), "Internal server error");
}

#[tokio::test]
async fn test_download_original_is_attachment() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, headers, body) = app.get("/download-original").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"original_image.png\""
    );
    assert!(body.starts_with(PNG_SIGNATURE));
}

// ============================================================================
// Depth range
// ============================================================================

#[tokio::test]
async fn test_depth_range_image() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, headers, body) = app.get("/depth-range-image?depth_min=4&depth_max=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert!(body.starts_with(PNG_SIGNATURE));
}

#[tokio::test]
async fn test_depth_range_without_rows_is_404() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, _, body) = app.get("/depth-range-image?depth_min=100&depth_max=200").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(&body), "No data available for the specified depth range.");
}

#[tokio::test]
async fn test_depth_range_missing_bound_is_422() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;

    let (status, _, body) = app.get("/depth-range-image?depth_min=4").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail(&body), "depth_max is required");

    let (status, _, _) = app.get("/download-depth-range").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_depth_range_malformed_bound_is_400() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, _, _) = app.get("/depth-range-image?depth_min=shallow&depth_max=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_depth_range_filename() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, headers, _) = app.get("/download-depth-range?depth_min=4&depth_max=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"depth_range_4.0_to_10.0.png\""
    );
}

// ============================================================================
// Resized image and startup population
// ============================================================================

#[tokio::test]
async fn test_resized_before_population_is_404() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, _, body) = app.get("/resized-image").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(&body), "Resized image not found in DB.");
}

#[tokio::test]
async fn test_startup_population_serves_resized() {
    let csv = create_depth_table(20, 100);
    let app = TestApp::with_csv(Some(&csv), &["--resized-width", "150"]).await;

    assert!(populate_resized_cache(&app.state).await);
    assert!(!populate_resized_cache(&app.state).await);
    assert_eq!(app.state.cache.count().await.unwrap(), 1);

    let (status, headers, body) = app.get("/resized-image").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(decoded_size(&body), (80, 60));

    let stored = app.state.cache.lookup("resized_150").await.unwrap().unwrap();
    assert_eq!(stored.image_blob, body);

    let (status, headers, download) = app.get("/download-resized").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"resized_image_w150.png\""
    );
    assert_eq!(download, body);
}

#[tokio::test]
async fn test_startup_population_failure_does_not_abort() {
    let app = TestApp::with_csv(None, &[]).await;

    assert!(!populate_resized_cache(&app.state).await);
    assert_eq!(app.state.cache.count().await.unwrap(), 0);

    let (status, _, _) = app.get("/download-resized").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Health and metrics
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, _, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let app = TestApp::with_csv(Some(THREE_ROW_CSV), &[]).await;
    let (status, headers, _) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_at_state_creation() {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite://{}", dir.path().join("test.db").display());
    let config = Config::try_parse_from([
        "depth-api",
        "--database-url",
        &database_url,
        "--resized-width",
        "0",
    ])
    .unwrap();

    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    assert!(AppState::new(config, prometheus).await.is_err());
}
