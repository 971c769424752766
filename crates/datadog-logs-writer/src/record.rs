// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log records handed to the writer by the upstream pipeline.
//!
//! Only the record value matters here. Keys, topics, partitions and offsets stay
//! with the caller, which owns commit semantics.

use std::str::Utf8Error;

/// One log line, stored as the raw bytes received from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    value: Vec<u8>,
}

impl LogRecord {
    #[must_use]
    pub fn from_bytes(value: Vec<u8>) -> Self {
        LogRecord { value }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The record value as text, or the UTF-8 error that keeps it out of a JSON string.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.value)
    }
}

impl From<String> for LogRecord {
    fn from(value: String) -> Self {
        LogRecord {
            value: value.into_bytes(),
        }
    }
}

impl From<&str> for LogRecord {
    fn from(value: &str) -> Self {
        LogRecord {
            value: value.as_bytes().to_vec(),
        }
    }
}

impl From<Vec<u8>> for LogRecord {
    fn from(value: Vec<u8>) -> Self {
        LogRecord::from_bytes(value)
    }
}
