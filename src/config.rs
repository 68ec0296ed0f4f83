//! Server configuration, read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Default canvas width in cells
pub const DEFAULT_CANVAS_WIDTH: u32 = 100;

/// Default canvas height in cells
pub const DEFAULT_CANVAS_HEIGHT: u32 = 100;

/// Largest accepted canvas side.
///
/// A `fullCanvas` snapshot goes out as one frame of roughly ten bytes per
/// cell, and viewers accept at most [`MAX_SNAPSHOT_FRAME`] bytes per frame.
pub const MAX_CANVAS_SIDE: u32 = 1024;

/// Frame size limit of tokio-tungstenite's default client configuration
pub const MAX_SNAPSHOT_FRAME: usize = 16 << 20;

/// Directory holding the browser viewer
pub const DEFAULT_STATIC_DIR: &str = "static";

/// WebSocket endpoint path
pub const WS_PATH: &str = "/ws";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{var} must be between 1 and 1024, got {value}")]
    OutOfRange { var: &'static str, value: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_var(&lookup, "HOST", "IP address")?.unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", "port number")?.unwrap_or(defaults.port);
        let canvas_width =
            parse_var(&lookup, "CANVAS_WIDTH", "integer")?.unwrap_or(defaults.canvas_width);
        let canvas_height =
            parse_var(&lookup, "CANVAS_HEIGHT", "integer")?.unwrap_or(defaults.canvas_height);
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        check_side("CANVAS_WIDTH", canvas_width)?;
        check_side("CANVAS_HEIGHT", canvas_height)?;

        Ok(Self {
            host,
            port,
            canvas_width,
            canvas_height,
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(
    lookup: &F,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                expected,
                value,
            }),
    }
}

fn check_side(var: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_CANVAS_SIDE {
        return Err(ConfigError::OutOfRange { var, value });
    }
    Ok(())
}
