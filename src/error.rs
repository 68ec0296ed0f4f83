use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum PixelboardError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
