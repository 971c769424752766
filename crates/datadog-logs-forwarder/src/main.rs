// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::process::ExitCode;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use datadog_logs_writer::transport::Transport;
use datadog_logs_writer::{LogRecord, LogsApiWriter, LogsWriterError, WriterConfig};

const DEFAULT_WRITE_SIZE: usize = 500;

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var("DD_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let write_size = match env::var("DD_FORWARDER_WRITE_SIZE") {
        Ok(val) => match val.trim().parse::<usize>() {
            Ok(size) if size > 0 => size,
            _ => {
                error!("Invalid DD_FORWARDER_WRITE_SIZE '{val}', must be a positive integer");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => DEFAULT_WRITE_SIZE,
    };

    let config = match WriterConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Error creating config on logs forwarder startup: {e}");
            return ExitCode::FAILURE;
        }
    };

    let writer = match LogsApiWriter::new(config) {
        Ok(w) => w,
        Err(e) => {
            error!("Error creating logs writer: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Forwarding stdin to {}:{} in writes of up to {} records",
        writer.config().host,
        writer.config().port,
        write_size
    );

    match forward(BufReader::new(io::stdin()), &writer, write_size).await {
        Ok(total) => {
            info!("Forwarded {total} records");
            ExitCode::SUCCESS
        }
        Err(ForwardError::Read(e)) => {
            error!("Failed to read from stdin: {e}");
            ExitCode::FAILURE
        }
        Err(ForwardError::Write { forwarded, error }) => {
            error!(
                "Stopping after {} records were forwarded and {} more batches accepted: {}",
                forwarded,
                error.sent_batches(),
                error
            );
            ExitCode::FAILURE
        }
    }
}

enum ForwardError {
    Read(std::io::Error),
    Write {
        forwarded: usize,
        error: LogsWriterError,
    },
}

/// Reads lines from `reader` and hands them to `writer` in chunks of `write_size`.
async fn forward<R, T>(
    reader: R,
    writer: &LogsApiWriter<T>,
    write_size: usize,
) -> Result<usize, ForwardError>
where
    R: AsyncBufRead + Unpin,
    T: Transport,
{
    let mut lines = reader.lines();
    let mut pending: Vec<LogRecord> = Vec::with_capacity(write_size);
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await.map_err(ForwardError::Read)? {
        if line.trim().is_empty() {
            continue;
        }
        pending.push(LogRecord::from(line));
        if pending.len() >= write_size {
            flush(writer, &mut pending, &mut forwarded).await?;
        }
    }

    flush(writer, &mut pending, &mut forwarded).await?;
    Ok(forwarded)
}

async fn flush<T: Transport>(
    writer: &LogsApiWriter<T>,
    pending: &mut Vec<LogRecord>,
    forwarded: &mut usize,
) -> Result<(), ForwardError> {
    if pending.is_empty() {
        return Ok(());
    }
    if let Err(error) = writer.write(pending).await {
        return Err(ForwardError::Write {
            forwarded: *forwarded,
            error,
        });
    }
    *forwarded += pending.len();
    pending.clear();
    Ok(())
}
