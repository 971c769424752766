// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::record::LogRecord;

/// Splits `records` into contiguous, ordered batches of at most `max_batch_length`.
///
/// Every batch is non-empty, only the last one may be short, and an empty input
/// yields no batches. `max_batch_length` is validated by
/// [`crate::config::WriterConfig::validate`]; a zero here is clamped to one.
pub fn partition(records: &[LogRecord], max_batch_length: usize) -> Vec<&[LogRecord]> {
    records.chunks(max_batch_length.max(1)).collect()
}
