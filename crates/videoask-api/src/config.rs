//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use videoask_playback::config::PlaybackConfig;

use crate::error::AppError;

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Node file to play (`VIDEOASK_GRAPH`).
    pub graph_path: PathBuf,
    /// Where a terminated sequence sends the viewer (`VIDEOASK_REDIRECT`).
    pub redirect_target: String,
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
}

impl ServerConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `VIDEOASK_GRAPH` is unset or `PORT` is
    /// not a valid port.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let graph_path = lookup("VIDEOASK_GRAPH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config("VIDEOASK_GRAPH environment variable must be set".to_owned())
            })?;
        let redirect_target = lookup("VIDEOASK_REDIRECT")
            .unwrap_or_else(|| PlaybackConfig::default().redirect_target);
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        Ok(Self {
            graph_path,
            redirect_target,
            host,
            port,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Playback timings with the configured redirect.
    #[must_use]
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            redirect_target: self.redirect_target.clone(),
            ..PlaybackConfig::default()
        }
    }
}
