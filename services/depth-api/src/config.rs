//! Service configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use depth_common::{DepthError, DepthResult};
use renderer::{CanvasSize, Palette};

#[derive(Parser, Debug, Clone)]
#[command(name = "depth-api")]
#[command(about = "Serves colour-mapped depth images over HTTP")]
pub struct Config {
    /// Bind host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value_t = 7998)]
    pub port: u16,

    #[arg(long, env = "APP_NAME", default_value = "Depth Image API")]
    pub app_name: String,

    /// SQLite database holding cached images
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://depth_image.db")]
    pub database_url: String,

    /// Depth CSV rendered by every image route
    #[arg(long, env = "DATA_CSV_PATH", default_value = "data/data.csv")]
    pub data_csv_path: PathBuf,

    /// Palette used when a request does not name one
    #[arg(long, env = "DEFAULT_COLORMAP", default_value = "magma")]
    pub default_colormap: String,

    /// Column count of the cached resized image
    #[arg(long, env = "RESIZED_WIDTH", default_value_t = 150)]
    pub resized_width: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    /// Output image width in pixels
    #[arg(long, env = "CANVAS_WIDTH", default_value_t = 775)]
    pub canvas_width: usize,

    /// Output image height in pixels
    #[arg(long, env = "CANVAS_HEIGHT", default_value_t = 616)]
    pub canvas_height: usize,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Config {
    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> DepthResult<()> {
        if self.resized_width == 0 {
            return Err(DepthError::InvalidParameter {
                param: "resized_width".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(DepthError::InvalidParameter {
                param: "canvas".to_string(),
                message: format!("{}x{} has no area", self.canvas_width, self.canvas_height),
            });
        }
        self.default_palette()?;
        Ok(())
    }

    pub fn default_palette(&self) -> DepthResult<Palette> {
        self.default_colormap.parse()
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Unknown names fall back to INFO.
    pub fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" | "critical" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["depth-api"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override() {
        let config = parse(&[
            "--port",
            "9000",
            "--resized-width",
            "64",
            "--default-colormap",
            "viridis",
            "--log-json",
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.resized_width, 64);
        assert_eq!(config.default_colormap, "viridis");
        assert!(config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let config = parse(&["--resized-width", "0"]);
        assert!(matches!(
            config.validate(),
            Err(DepthError::InvalidParameter { ref param, .. }) if param == "resized_width"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_canvas() {
        let config = parse(&["--canvas-width", "0", "--canvas-height", "616"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_colormap() {
        let config = parse(&["--default-colormap", "rainbowish"]);
        assert!(matches!(config.validate(), Err(DepthError::UnknownPalette(_))));
    }

    #[test]
    fn test_tracing_level() {
        let mut config = parse(&["--log-level", "DEBUG"]);
        assert_eq!(config.tracing_level(), Level::DEBUG);
        config.log_level = "CRITICAL".to_string();
        assert_eq!(config.tracing_level(), Level::ERROR);
        config.log_level = "verbose".to_string();
        assert_eq!(config.tracing_level(), Level::INFO);
    }

    #[test]
    fn test_listen_addr() {
        let config = parse(&["--host", "127.0.0.1", "--port", "8080"]);
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }
}
