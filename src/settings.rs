use crate::common::layout::{Layout, BOARD_SIZE};
use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8888/";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("endpoint must use ws or wss, got {0}")]
    UnsupportedScheme(String),

    #[error("board size must be a positive number of pixels, got {0}")]
    InvalidBoardSize(String),
}

/// Client configuration. Every flag can also be set from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "frozen-lake-showcase", version, about = "FrozenLake training visualizer")]
pub struct Settings {
    /// WebSocket address of the training server.
    #[arg(long, env = "SHOWCASE_ENDPOINT", default_value = DEFAULT_ENDPOINT, value_parser = parse_endpoint)]
    pub endpoint: Url,

    /// Pause between reconnection attempts.
    #[arg(long, env = "SHOWCASE_RECONNECT_DELAY_MS", default_value_t = 1000)]
    pub reconnect_delay_ms: u64,

    /// How long the agent takes to slide from one tile to the next.
    #[arg(long, env = "SHOWCASE_GLIDE_MS", default_value_t = 100)]
    pub glide_ms: u64,

    /// Side length of the lake in pixels.
    #[arg(long, env = "SHOWCASE_BOARD_SIZE", default_value_t = BOARD_SIZE, value_parser = parse_board_size)]
    pub board_size: f32,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "SHOWCASE_LOG", default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn layout(&self) -> Layout {
        Layout::with_board_size(self.board_size)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn glide(&self) -> Duration {
        Duration::from_millis(self.glide_ms)
    }

    /// Installs the global fmt subscriber. `RUST_LOG` wins over `log_level`.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

fn parse_endpoint(s: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(s)?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(SettingsError::UnsupportedScheme(other.to_string())),
    }
}

fn parse_board_size(s: &str) -> Result<f32, SettingsError> {
    match s.parse::<f32>() {
        Ok(size) if size.is_finite() && size > 0. => Ok(size),
        _ => Err(SettingsError::InvalidBoardSize(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_requires_websocket_scheme() {
        assert!(parse_endpoint("ws://127.0.0.1:8888/").is_ok());
        assert!(parse_endpoint("wss://example.org/lake").is_ok());
        assert!(matches!(
            parse_endpoint("http://127.0.0.1:8888/"),
            Err(SettingsError::UnsupportedScheme(s)) if s == "http"
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(SettingsError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn board_size_must_be_positive() {
        assert_eq!(parse_board_size("480").unwrap(), 480.);
        assert!(parse_board_size("0").is_err());
        assert!(parse_board_size("-10").is_err());
        assert!(parse_board_size("NaN").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let settings = Settings::try_parse_from([
            "frozen-lake-showcase",
            "--endpoint",
            "ws://10.0.0.2:9000/",
            "--reconnect-delay-ms",
            "250",
            "--board-size",
            "400",
            "--glide-ms",
            "0",
        ])
        .unwrap();

        assert_eq!(settings.endpoint.as_str(), "ws://10.0.0.2:9000/");
        assert_eq!(settings.reconnect_delay(), Duration::from_millis(250));
        assert_eq!(settings.layout().board_size, 400.);
        assert_eq!(settings.glide(), Duration::ZERO);
    }
}
