// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client construction for the logs intake.
//!
//! The client speaks HTTP/1.1 only, uses rustls for `https` endpoints, and
//! bounds every exchange with the configured timeout. An HTTPS proxy is used
//! when configured; a proxy URL that cannot be parsed falls back to a direct
//! connection instead of failing the writer.

use crate::config::WriterConfig;
use core::time::Duration;
use std::error::Error;
use tracing::error;

/// Creates a configured HTTP client.
#[must_use]
pub fn get_client(config: &WriterConfig) -> reqwest::Client {
    match build_client(config) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "LOGS | Unable to parse proxy configuration: {}, falling back to direct connection",
                e
            );
            match build_client_without_proxy(config) {
                Ok(client) => client,
                Err(inner) => {
                    error!(
                        "LOGS | Failed to build HTTP client without proxy: {}, using reqwest defaults",
                        inner
                    );
                    reqwest::Client::new()
                }
            }
        }
    }
}

fn client_builder(config: &WriterConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(config.timeout)
        .pool_idle_timeout(Some(Duration::from_secs(270)))
        .tcp_keepalive(Some(Duration::from_secs(120)))
        .http1_only()
}

fn build_client(config: &WriterConfig) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = client_builder(config);
    if let Some(proxy) = &config.https_proxy {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    Ok(builder.build()?)
}

fn build_client_without_proxy(config: &WriterConfig) -> Result<reqwest::Client, Box<dyn Error>> {
    Ok(client_builder(config).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_without_proxy() {
        let config = WriterConfig::new("test-api-key");
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let config = WriterConfig {
            https_proxy: Some("http://proxy.local:3128".to_string()),
            ..WriterConfig::new("test-api-key")
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_invalid_proxy_falls_back() {
        let config = WriterConfig {
            https_proxy: Some("http://[::1".to_string()),
            ..WriterConfig::new("test-api-key")
        };
        assert!(build_client(&config).is_err());
        // Still yields a usable client
        let _client = get_client(&config);
    }
}
