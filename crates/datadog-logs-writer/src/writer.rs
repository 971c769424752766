// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching writer for the Datadog logs intake.
//!
//! ```text
//!   write(records)
//!       │
//!       v
//!   ┌─────────────┐
//!   │  Partition  │ (≤ max_batch_length records each)
//!   └──────┬──────┘
//!          │  for each batch, in order
//!          v
//!   ┌─────────────┐
//!   │  Serialize  │ (JSON envelope + metadata)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │  Compress   │ (gzip or zstd)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │  HTTP POST  │ ──── failure ──> stop, report batch index
//!   └─────────────┘
//! ```
//!
//! Nothing is retried or persisted here. The first failing batch ends the call
//! and the caller decides what to do with the records.

use crate::batch::partition;
use crate::config::WriterConfig;
use crate::envelope::{self, LogMetadata};
use crate::error::{DeliveryError, LogsWriterError};
use crate::record::LogRecord;
use crate::transport::{intake_headers, intake_url, HttpTransport, IntakeRequest, Transport};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

pub struct LogsApiWriter<T: Transport = HttpTransport> {
    config: Arc<WriterConfig>,
    metadata: LogMetadata,
    url: String,
    headers: HeaderMap,
    transport: T,
}

impl LogsApiWriter<HttpTransport> {
    /// Writer posting to the intake described by `config` over HTTP.
    pub fn new(config: WriterConfig) -> Result<Self, LogsWriterError> {
        config.validate()?;
        let transport = HttpTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> LogsApiWriter<T> {
    pub fn with_transport(config: WriterConfig, transport: T) -> Result<Self, LogsWriterError> {
        config.validate()?;
        Ok(LogsApiWriter {
            metadata: LogMetadata::from_config(&config),
            url: intake_url(&config),
            headers: intake_headers(config.compression),
            config: Arc::new(config),
            transport,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    #[must_use]
    pub fn metadata(&self) -> &LogMetadata {
        &self.metadata
    }

    /// Sends `records` as consecutive batches, in order, one request at a time.
    ///
    /// Returns once every batch was accepted, or with the first failure. Batches
    /// accepted before a failure stay sent.
    pub async fn write(&self, records: &[LogRecord]) -> Result<(), LogsWriterError> {
        let batches = partition(records, self.config.max_batch_length);
        if batches.is_empty() {
            return Ok(());
        }
        debug!(
            "LOGS | Sending {} records in {} batches",
            records.len(),
            batches.len()
        );

        for (index, batch) in batches.iter().enumerate() {
            let body = envelope::serialize(batch, &self.metadata).map_err(|source| {
                error!("LOGS | Failed to serialize batch {}: {}", index, source);
                LogsWriterError::Serialization {
                    batch: index,
                    source,
                }
            })?;
            let payload = self
                .config
                .compression
                .compress(&body, self.config.compression_level)
                .map_err(|source| {
                    error!("LOGS | Failed to compress batch {}: {}", index, source);
                    LogsWriterError::Request {
                        batch: index,
                        source,
                    }
                })?;
            self.send(index, batch.len(), payload).await?;
        }

        debug!("LOGS | Successfully sent {} batches", batches.len());
        Ok(())
    }

    async fn send(
        &self,
        index: usize,
        record_count: usize,
        payload: Vec<u8>,
    ) -> Result<(), LogsWriterError> {
        let request = IntakeRequest {
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: payload,
        };

        let time = Instant::now();
        let resp = self.transport.send(request).await;
        let elapsed = time.elapsed();

        let failure = match resp {
            Ok(resp) if resp.status.is_success() => {
                debug!(
                    "LOGS | Batch {} with {} records accepted in {} ms",
                    index,
                    record_count,
                    elapsed.as_millis()
                );
                return Ok(());
            }
            Ok(resp) => {
                if resp.status == StatusCode::FORBIDDEN {
                    error!(
                        "LOGS | Request was denied by Datadog: Access denied. Please verify that your API key is valid."
                    );
                } else {
                    error!(
                        "LOGS | {}: Failed to send batch {} after {} ms: {:?}",
                        resp.status,
                        index,
                        elapsed.as_millis(),
                        resp.body
                    );
                }
                DeliveryError::Status {
                    status: resp.status,
                    body: resp.body,
                }
            }
            Err(e) => {
                error!(
                    "LOGS | Failed to send batch {} after {} ms: {:?}",
                    index,
                    elapsed.as_millis(),
                    e
                );
                DeliveryError::Network(e)
            }
        };

        Err(LogsWriterError::Delivery {
            batch: index,
            source: failure,
        })
    }
}
