// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ships log records to the Datadog logs intake.
//!
//! Records are split into batches of bounded length, wrapped in a JSON
//! envelope carrying shared metadata, compressed, and posted to
//! `/v1/input/<api-key>` one batch at a time. See [`writer::LogsApiWriter`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod compression;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod record;
pub mod transport;
pub mod writer;

pub use config::WriterConfig;
pub use error::{DeliveryError, LogsWriterError};
pub use record::LogRecord;
pub use writer::LogsApiWriter;
