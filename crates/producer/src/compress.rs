//! Snapshot encoding

use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// How dump output is encoded before it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Gzip the dump output (plain SQL dumps)
    #[default]
    Gzip,
    /// Store the output as-is (dump formats that compress themselves)
    None,
}

impl Compression {
    /// Filename extension for snapshots in this encoding
    pub fn extension(self) -> &'static str {
        match self {
            Compression::Gzip => "gz",
            Compression::None => "dump",
        }
    }

    /// Encode raw dump output
    pub fn encode(self, raw: Vec<u8>) -> io::Result<Vec<u8>> {
        match self {
            Compression::Gzip => gzip(&raw),
            Compression::None => Ok(raw),
        }
    }
}

/// Gzip `data` at the default compression level
pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
