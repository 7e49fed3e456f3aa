use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::{
    error::{AppError, Result},
    logging::LogFormat,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub client_origin: Option<String>,
    /// `None` disables keep-alive comments on event streams.
    pub keep_alive: Option<Duration>,
    pub index_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            client_origin: None,
            keep_alive: Some(Duration::from_secs(15)),
            index_path: PathBuf::from("static/index.html"),
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Read the environment over the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or(defaults.host);

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::ConfigError(format!("PORT must be a number (got {})", raw)))?,
            Err(_) => defaults.port,
        };

        let client_origin = env::var("CLIENT_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        let keep_alive = match env::var("SSE_KEEP_ALIVE_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    AppError::ConfigError(format!(
                        "SSE_KEEP_ALIVE_SECS must be a number (got {})",
                        raw
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => defaults.keep_alive,
        };

        let index_path = env::var("INDEX_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.index_path);

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse::<LogFormat>()?,
            Err(_) => defaults.log_format,
        };

        Ok(Config {
            host,
            port,
            client_origin,
            keep_alive,
            index_path,
            log_level,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_summary(&self) {
        info!("📋 Configuration loaded:");
        info!("  - Bind address: {}", self.bind_address());
        info!(
            "  - CORS origin: {}",
            self.client_origin.as_deref().unwrap_or("any")
        );
        match self.keep_alive {
            Some(interval) => info!("  - SSE keep-alive: {}s", interval.as_secs()),
            None => info!("  - SSE keep-alive: disabled"),
        }
        info!("  - Index page: {}", self.index_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8001");
        assert_eq!(config.keep_alive, Some(Duration::from_secs(15)));
        assert!(config.client_origin.is_none());
        assert_eq!(config.log_format, LogFormat::Compact);
    }
}
