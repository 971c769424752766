// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::compression::Compression;
use crate::error::LogsWriterError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOGS_HOST: &str = "http-intake.logs.datadoghq.com";
pub const DEFAULT_LOGS_PORT: u16 = 443;
pub const DEFAULT_MAX_BATCH_LENGTH: usize = 50;
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one writer, fixed for the writer's lifetime.
///
/// Each connector task builds its own value and hands it to the writer, so
/// several writers in one process never share mutable state.
#[derive(Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Datadog API key, placed verbatim in the intake URL path
    pub api_key: String,
    /// Intake host (e.g., http-intake.logs.datadoghq.com)
    pub host: String,
    pub port: u16,
    /// `https` when enabled, plain `http` otherwise
    pub use_tls: bool,
    /// Maximum number of records per request
    pub max_batch_length: usize,
    /// Comma-separated `key:value` tags attached to every payload
    pub tags: Option<String>,
    pub hostname: Option<String>,
    pub service: Option<String>,
    pub compression: Compression,
    pub compression_level: i32,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    /// Bound on a single HTTP exchange; hitting it counts as a delivery failure
    pub timeout: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: DEFAULT_LOGS_HOST.to_string(),
            port: DEFAULT_LOGS_PORT,
            use_tls: true,
            max_batch_length: DEFAULT_MAX_BATCH_LENGTH,
            tags: None,
            hostname: None,
            service: None,
            compression: Compression::Gzip,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            https_proxy: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for WriterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterConfig")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("max_batch_length", &self.max_batch_length)
            .field("tags", &self.tags)
            .field("hostname", &self.hostname)
            .field("service", &self.service)
            .field("compression", &self.compression)
            .field("compression_level", &self.compression_level)
            .field("https_proxy", &self.https_proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WriterConfig {
    /// Default settings for the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, LogsWriterError> {
        let api_key = env::var("DD_API_KEY").map_err(|_| {
            LogsWriterError::InvalidConfig("DD_API_KEY environment variable is not set".to_string())
        })?;
        let host = env::var("DD_LOGS_URL").unwrap_or_else(|_| DEFAULT_LOGS_HOST.to_string());
        let port = parse_env("DD_LOGS_PORT")?.unwrap_or(DEFAULT_LOGS_PORT);
        let use_tls = env::var("DD_LOGS_USE_SSL")
            .map(|val| val.trim().to_lowercase() != "false")
            .unwrap_or(true);
        let max_batch_length =
            parse_env("DD_LOGS_MAX_BATCH_LENGTH")?.unwrap_or(DEFAULT_MAX_BATCH_LENGTH);
        let compression = parse_env::<Compression>("DD_LOGS_COMPRESSION")?.unwrap_or_default();
        let compression_level =
            parse_env("DD_LOGS_COMPRESSION_LEVEL")?.unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        let https_proxy = non_empty_env("DD_PROXY_HTTPS").or_else(|| non_empty_env("HTTPS_PROXY"));
        let timeout =
            Duration::from_secs(parse_env("DD_LOGS_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let config = Self {
            api_key,
            host,
            port,
            use_tls,
            max_batch_length,
            tags: non_empty_env("DD_TAGS"),
            hostname: non_empty_env("DD_HOSTNAME"),
            service: non_empty_env("DD_SERVICE"),
            compression,
            compression_level,
            https_proxy,
            timeout,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LogsWriterError> {
        if self.api_key.trim().is_empty() {
            return Err(LogsWriterError::InvalidConfig(
                "API key cannot be empty".to_string(),
            ));
        }

        if self.host.trim().is_empty() {
            return Err(LogsWriterError::InvalidConfig(
                "Logs intake host cannot be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(LogsWriterError::InvalidConfig(
                "Logs intake port must be greater than 0".to_string(),
            ));
        }

        if self.max_batch_length == 0 {
            return Err(LogsWriterError::InvalidConfig(
                "Max batch length must be greater than 0".to_string(),
            ));
        }

        let levels = self.compression.level_range();
        if !levels.contains(&self.compression_level) {
            return Err(LogsWriterError::InvalidConfig(format!(
                "Invalid {} compression level {}. Must be between {} and {}",
                self.compression,
                self.compression_level,
                levels.start(),
                levels.end()
            )));
        }

        if self.timeout.is_zero() {
            return Err(LogsWriterError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|val| !val.trim().is_empty())
}

fn parse_env<T>(name: &str) -> Result<Option<T>, LogsWriterError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match non_empty_env(name) {
        Some(val) => val.trim().parse::<T>().map(Some).map_err(|e| {
            LogsWriterError::InvalidConfig(format!("Invalid value '{val}' for {name}: {e}"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 14] = [
        "DD_API_KEY",
        "DD_LOGS_URL",
        "DD_LOGS_PORT",
        "DD_LOGS_USE_SSL",
        "DD_LOGS_MAX_BATCH_LENGTH",
        "DD_TAGS",
        "DD_HOSTNAME",
        "DD_SERVICE",
        "DD_LOGS_COMPRESSION",
        "DD_LOGS_COMPRESSION_LEVEL",
        "DD_PROXY_HTTPS",
        "HTTPS_PROXY",
        "DD_LOGS_TIMEOUT_SECS",
        "DD_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config_needs_api_key() {
        let config = WriterConfig::default();
        assert!(config.validate().is_err());

        let config = WriterConfig::new("some-key");
        assert!(config.validate().is_ok());
        assert_eq!(config.max_batch_length, DEFAULT_MAX_BATCH_LENGTH);
        assert!(config.use_tls);
    }

    #[test]
    fn test_validate_zero_batch_length() {
        let config = WriterConfig {
            max_batch_length: 0,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_batch_length_of_one() {
        let config = WriterConfig {
            max_batch_length: 1,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = WriterConfig {
            port: 0,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_host() {
        let config = WriterConfig {
            host: "  ".to_string(),
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_compression_level() {
        let config = WriterConfig {
            compression_level: 12,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_err());

        let config = WriterConfig {
            compression: Compression::Zstd,
            compression_level: 12,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = WriterConfig {
            timeout: Duration::ZERO,
            ..WriterConfig::new("some-key")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = WriterConfig::new("super-secret-key");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-secret-key"));
        assert!(debug_str.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_error_if_no_api_key_env_var() {
        clear_env();
        let config = WriterConfig::from_env();
        assert!(config.is_err());
        assert!(config
            .unwrap_err()
            .to_string()
            .contains("DD_API_KEY environment variable is not set"));
    }

    #[test]
    #[serial]
    fn test_defaults_from_env() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        let config = WriterConfig::from_env().expect("config should load");
        assert_eq!(config.api_key, "_not_a_real_key_");
        assert_eq!(config.host, DEFAULT_LOGS_HOST);
        assert_eq!(config.port, DEFAULT_LOGS_PORT);
        assert!(config.use_tls);
        assert_eq!(config.max_batch_length, DEFAULT_MAX_BATCH_LENGTH);
        assert_eq!(config.tags, None);
        assert_eq!(config.hostname, None);
        assert_eq!(config.service, None);
        assert_eq!(config.compression, Compression::Gzip);
        assert_eq!(config.https_proxy, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        env::set_var("DD_LOGS_URL", "localhost");
        env::set_var("DD_LOGS_PORT", "8080");
        env::set_var("DD_LOGS_USE_SSL", "FALSE");
        env::set_var("DD_LOGS_MAX_BATCH_LENGTH", "1");
        env::set_var("DD_TAGS", "team:agent-core, author:berzan");
        env::set_var("DD_HOSTNAME", "test-host");
        env::set_var("DD_SERVICE", "test-service");
        env::set_var("DD_LOGS_COMPRESSION", "zstd");
        env::set_var("DD_LOGS_COMPRESSION_LEVEL", "3");
        env::set_var("HTTPS_PROXY", "http://proxy.local:3128");
        env::set_var("DD_LOGS_TIMEOUT_SECS", "5");

        let config = WriterConfig::from_env().expect("config should load");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(!config.use_tls);
        assert_eq!(config.max_batch_length, 1);
        assert_eq!(
            config.tags.as_deref(),
            Some("team:agent-core, author:berzan")
        );
        assert_eq!(config.hostname.as_deref(), Some("test-host"));
        assert_eq!(config.service.as_deref(), Some("test-service"));
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.compression_level, 3);
        assert_eq!(
            config.https_proxy.as_deref(),
            Some("http://proxy.local:3128")
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_dd_proxy_takes_precedence() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        env::set_var("DD_PROXY_HTTPS", "http://dd-proxy:3128");
        env::set_var("HTTPS_PROXY", "http://other-proxy:3128");
        let config = WriterConfig::from_env().expect("config should load");
        assert_eq!(config.https_proxy.as_deref(), Some("http://dd-proxy:3128"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_metadata_env_is_unset() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        env::set_var("DD_TAGS", "");
        env::set_var("DD_HOSTNAME", "   ");
        let config = WriterConfig::from_env().expect("config should load");
        assert_eq!(config.tags, None);
        assert_eq!(config.hostname, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_env() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        env::set_var("DD_LOGS_MAX_BATCH_LENGTH", "-1");
        let err = WriterConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("DD_LOGS_MAX_BATCH_LENGTH"));

        env::set_var("DD_LOGS_MAX_BATCH_LENGTH", "0");
        assert!(WriterConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_compression_env() {
        clear_env();
        env::set_var("DD_API_KEY", "_not_a_real_key_");
        env::set_var("DD_LOGS_COMPRESSION", "brotli");
        let err = WriterConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("brotli"));
        clear_env();
    }
}
