// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery of compressed envelopes to the logs intake.
//!
//! [`Transport`] is the only seam between the writer and the network: it posts
//! bytes to a URL and reports the status, or the error that kept the request
//! from completing. [`HttpTransport`] is the reqwest-backed implementation;
//! tests substitute their own.

use crate::compression::Compression;
use crate::config::WriterConfig;
use crate::error::BoxError;
use crate::http::get_client;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::StatusCode;

/// A single POST to the intake.
#[derive(Debug, Clone)]
pub struct IntakeRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// Compressed envelope
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct IntakeResponse {
    pub status: StatusCode,
    /// Response body, only read for non-success statuses.
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `request` and returns the intake's response.
    ///
    /// `Err` means no response was received (connection refused, timeout, ...).
    /// Non-success statuses are returned as `Ok` and judged by the caller.
    async fn send(&self, request: IntakeRequest) -> Result<IntakeResponse, BoxError>;
}

/// `<scheme>://<host>:<port>/v1/input/<api-key>`, with the API key verbatim.
#[must_use]
pub fn intake_url(config: &WriterConfig) -> String {
    let scheme = if config.use_tls { "https" } else { "http" };
    format!(
        "{}://{}:{}/v1/input/{}",
        scheme, config.host, config.port, config.api_key
    )
}

/// Headers carried by every intake request.
#[must_use]
pub fn intake_headers(compression: Compression) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_ENCODING,
        HeaderValue::from_static(compression.content_encoding()),
    );
    headers
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new(config: &WriterConfig) -> Self {
        HttpTransport {
            client: get_client(config),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: IntakeRequest) -> Result<IntakeResponse, BoxError> {
        let resp = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = resp.status();
        // Don't read response body unless needed
        let body = if status.is_success() {
            String::new()
        } else {
            resp.text().await.unwrap_or_default()
        };
        Ok(IntakeResponse { status, body })
    }
}
