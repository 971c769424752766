// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! JSON envelopes sent to the logs intake.
//!
//! One envelope wraps one batch:
//!
//! ```text
//! {"message":["line 1","line 2"],"ddsource":"kafka-connect","ddtags":"env:prod","hostname":"h","service":"s"}
//! ```
//!
//! Optional keys are left out entirely when not configured. Field order is
//! fixed by the struct layout, so the same batch and metadata always produce
//! the same bytes.

use crate::config::WriterConfig;
use crate::record::LogRecord;
use serde::Serialize;

/// Value of the `ddsource` attribute on every envelope.
pub const DD_SOURCE: &str = "kafka-connect";

/// Metadata shared by every envelope a writer produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMetadata {
    tags: Option<String>,
    hostname: Option<String>,
    service: Option<String>,
}

impl LogMetadata {
    #[must_use]
    pub fn new(tags: Option<&str>, hostname: Option<&str>, service: Option<&str>) -> Self {
        LogMetadata {
            tags: tags.and_then(normalize_tags),
            hostname: hostname.and_then(non_empty),
            service: service.and_then(non_empty),
        }
    }

    #[must_use]
    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(
            config.tags.as_deref(),
            config.hostname.as_deref(),
            config.service.as_deref(),
        )
    }

    #[must_use]
    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }
}

/// Joins comma-separated tags with surrounding whitespace removed from each entry.
fn normalize_tags(tags: &str) -> Option<String> {
    let joined = tags
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<&str>>()
        .join(",");
    non_empty(&joined)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    message: Vec<&'a str>,
    ddsource: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ddtags: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// `index` is the position of the record inside its batch.
    #[error("record {index} is not valid UTF-8: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to encode envelope: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes `batch` with `metadata` into compact JSON.
pub fn serialize(batch: &[LogRecord], metadata: &LogMetadata) -> Result<Vec<u8>, EnvelopeError> {
    let message = batch
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .as_str()
                .map_err(|source| EnvelopeError::InvalidRecord { index, source })
        })
        .collect::<Result<Vec<&str>, EnvelopeError>>()?;

    let envelope = Envelope {
        message,
        ddsource: DD_SOURCE,
        ddtags: metadata.tags(),
        hostname: metadata.hostname(),
        service: metadata.service(),
    };

    Ok(serde_json::to_vec(&envelope)?)
}
