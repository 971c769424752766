// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Payload compression for intake requests.
//!
//! The scheme picked here is also what the request advertises in its
//! `Content-Encoding` header, so the two always agree.

use flate2::write::GzEncoder;
use std::fmt;
use std::io::Write;
use std::ops::RangeInclusive;
use std::str::FromStr;
use zstd::stream::write::Encoder as ZstdEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Gzip,
    Zstd,
}

impl Compression {
    /// Value of the `Content-Encoding` header for this scheme.
    #[must_use]
    pub fn content_encoding(self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::Zstd => "zstd",
        }
    }

    #[must_use]
    pub fn level_range(self) -> RangeInclusive<i32> {
        match self {
            Compression::Gzip => 0..=9,
            Compression::Zstd => 1..=22,
        }
    }

    /// Compress `data` at `level`.
    pub fn compress(self, data: &[u8], level: i32) -> std::io::Result<Vec<u8>> {
        match self {
            Compression::Gzip => {
                let level = u32::try_from(level).map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("invalid gzip compression level {level}"),
                    )
                })?;
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::new(level));
                encoder.write_all(data)?;
                encoder.finish()
            }
            Compression::Zstd => {
                let mut encoder = ZstdEncoder::new(Vec::new(), level)?;
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_encoding())
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gzip" => Ok(Compression::Gzip),
            "zstd" => Ok(Compression::Zstd),
            other => Err(format!(
                "unknown compression '{other}', expected gzip or zstd"
            )),
        }
    }
}
