//! Application state and shared resources.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use pipeline::SynthesisRequest;
use renderer::Palette;
use storage::ImageCache;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub cache: ImageCache,
    pub default_palette: Palette,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// Validate `config`, open the image cache and create its schema.
    pub async fn new(config: Config, prometheus: PrometheusHandle) -> Result<Self> {
        config.validate()?;
        let default_palette = config.default_palette()?;

        let cache = ImageCache::connect(&config.database_url).await?;
        cache.migrate().await?;
        info!(database_url = %config.database_url, "Database tables verified/created");

        Ok(Self {
            config,
            cache,
            default_palette,
            prometheus,
        })
    }

    /// Base request for every rendered route: configured canvas and the
    /// given palette, or the default one.
    pub fn request(&self, palette: Option<Palette>) -> SynthesisRequest {
        SynthesisRequest::default()
            .with_palette(palette.unwrap_or(self.default_palette))
            .with_canvas(self.config.canvas())
    }
}
