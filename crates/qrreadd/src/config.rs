//! Server configuration
//!
//! The listening port always comes from the `PORT` environment variable and
//! is required. Host and upload limit may be set in an optional TOML file:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! max_upload_bytes = 10485760
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use qrread_api::MAX_UPLOAD_SIZE;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the listening port
pub const PORT_ENV: &str = "PORT";

/// Errors that stop the daemon before it starts serving
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("$PORT must be set")]
    MissingPort,

    #[error("$PORT is not a valid port: {0:?}")]
    InvalidPort(String),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolved server settings, passed explicitly into server construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    host: Option<IpAddr>,
    max_upload_bytes: Option<usize>,
}

impl ServerConfig {
    /// Load from the process environment and an optional TOML file.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let port = std::env::var(PORT_ENV).ok();
        let file = match config_path {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(port.as_deref(), file)
    }

    fn resolve(port: Option<&str>, file: FileConfig) -> Result<Self, ConfigError> {
        let port = parse_port(port)?;

        Ok(Self {
            host: file
                .server
                .host
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port,
            max_upload_bytes: file.server.max_upload_bytes.unwrap_or(MAX_UPLOAD_SIZE),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ConfigError::MissingPort),
    };
    raw.parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
