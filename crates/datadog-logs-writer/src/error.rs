// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::envelope::EnvelopeError;
use reqwest::StatusCode;

/// Boxed error returned by [`crate::transport::Transport`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`crate::writer::LogsApiWriter`].
///
/// No variant is retried internally. Callers tell "delivery failed" apart from
/// "could not construct the request" with [`LogsWriterError::is_delivery_failure`].
#[derive(Debug, thiserror::Error)]
pub enum LogsWriterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize batch {batch}: {source}")]
    Serialization {
        batch: usize,
        #[source]
        source: EnvelopeError,
    },

    #[error("Failed to build request for batch {batch}: {source}")]
    Request {
        batch: usize,
        #[source]
        source: std::io::Error,
    },

    /// Batches go out in order, so `batch` is also the number already accepted.
    #[error("Failed to deliver batch {batch}: {source}")]
    Delivery {
        batch: usize,
        #[source]
        source: DeliveryError,
    },
}

impl LogsWriterError {
    /// True when the intake was reached (or tried) and did not acknowledge the payload.
    #[must_use]
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::Delivery { .. })
    }

    /// Number of batches accepted by the intake before the failing one.
    ///
    /// Errors raised before any send (configuration) report zero.
    #[must_use]
    pub fn sent_batches(&self) -> usize {
        match self {
            Self::InvalidConfig(_) => 0,
            Self::Serialization { batch, .. }
            | Self::Request { batch, .. }
            | Self::Delivery { batch, .. } => *batch,
        }
    }
}

/// Reason a single batch was not accepted by the intake.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("intake responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Network(#[source] BoxError),
}
