//! Pre-rendering of the resized image on service start.

use tracing::{error, info};

use depth_common::{DepthError, DepthResult};
use pipeline::synthesize;
use storage::resized_description;

use crate::state::AppState;

/// Render and store the resized image unless it is already cached.
///
/// Never fails: errors are logged and the resized routes answer 404 until a
/// later start succeeds. Returns whether a new row was written.
pub async fn populate_resized_cache(state: &AppState) -> bool {
    let description = resized_description(state.config.resized_width);
    match ensure_resized_image(state, &description).await {
        Ok(inserted) => inserted,
        Err(e) => {
            error!(
                description = %description,
                error = %e,
                "FATAL: Could not create and store initial image on startup"
            );
            false
        }
    }
}

async fn ensure_resized_image(state: &AppState, description: &str) -> DepthResult<bool> {
    if state.cache.lookup(description).await?.is_some() {
        info!(description = %description, "Resized image already cached");
        return Ok(false);
    }

    let width = state.config.resized_width;
    info!(width, "Generating and storing resized image");

    let source = state.config.data_csv_path.clone();
    let request = state.request(None).with_width(width);
    let png = tokio::task::spawn_blocking(move || synthesize(&source, &request))
        .await
        .map_err(|e| DepthError::Internal(format!("synthesis task failed: {}", e)))??;

    let inserted = state.cache.populate(description, &png).await?;
    if inserted {
        info!(description = %description, bytes = png.len(), "Image saved to database");
    } else {
        info!(description = %description, "Image stored concurrently by another process");
    }
    Ok(inserted)
}
