//! Depth image API server.
//!
//! Renders a depth CSV into colour-mapped PNGs and serves them over HTTP.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use depth_api::{build_router, startup::populate_resized_cache, AppState, Config};

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::parse();
    config.validate()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = config.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(config))?;
    Ok(())
}

async fn async_main(config: Config) -> Result<()> {
    // Initialize tracing
    let level = config.tracing_level();
    if config.log_json {
        let subscriber = FmtSubscriber::builder().with_max_level(level).json().finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    if let Some(threads) = config.worker_threads {
        info!("Configured tokio runtime with {} worker threads", threads);
    }

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics exporter initialized");
    info!(app_name = %config.app_name, "Starting depth image server");

    let state = Arc::new(AppState::new(config, prometheus_handle).await?);
    populate_resized_cache(&state).await;

    let addr = state.config.listen_addr();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
