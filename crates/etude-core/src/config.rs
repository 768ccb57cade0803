use std::str::FromStr;

use crate::error::{EtudeError, EtudeResult};

/// Output style for [`init_logging_from_config`](crate::logging::init_logging_from_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, colorized. Meant for a terminal.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line default formatter.
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = EtudeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(EtudeError::Config(format!("unknown LOG_FORMAT '{other}'"))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Fallback filter when `RUST_LOG` is unset (default: info)
    pub log_level: String,

    /// Log output style (default: compact)
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> EtudeResult<Self> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> EtudeResult<Self> {
        let defaults = Config::default();

        let server_port = match get("SERVER_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| EtudeError::Config(format!("invalid SERVER_PORT '{raw}'")))?,
            None => defaults.server_port,
        };
        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Config {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
        })
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> EtudeResult<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.is_dev());
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_overrides() {
        let config = load(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9999"),
            ("ENVIRONMENT", "production"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:9999");
        assert!(!config.is_dev());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = load(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, EtudeError::Config(_)));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
