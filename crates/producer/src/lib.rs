//! Snapshot producers for snapkeep
//!
//! The retention engine never runs a dump itself. It is handed something
//! implementing [`SnapshotProducer`], which returns the bytes to store
//! already in their final on-disk encoding.
//!
//! This crate provides:
//! - Structured dump commands (argument lists, never shell strings)
//! - Transports for running them locally, as another user or over SSH
//! - Gzip compression of the dump output

pub mod command;
pub mod compress;
pub mod dump;
pub mod transport;

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

// Re-exports
pub use command::DumpCommand;
pub use compress::Compression;
pub use dump::DumpProducer;
pub use transport::Transport;

/// Errors raised while producing a snapshot
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("invalid {what} '{value}'")]
    InvalidTarget { what: &'static str, value: String },

    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed with {status}{}", stderr_tail(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} produced no output")]
    EmptyOutput { program: String },

    #[error("failed to compress snapshot")]
    Compress(#[source] io::Error),
}

fn stderr_tail(stderr: &str) -> String {
    match stderr.trim().lines().last() {
        Some(line) if !line.trim().is_empty() => format!(": {}", line.trim()),
        _ => String::new(),
    }
}

/// A produced snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Bytes to write, in the producer's final encoding
    pub bytes: Vec<u8>,
    /// Size of the dump before compression
    pub dump_len: usize,
}

/// Source of new snapshots
pub trait SnapshotProducer {
    /// Encoding of the bytes returned by [`produce`](Self::produce)
    fn compression(&self) -> Compression;

    /// Run the dump and return its bytes
    fn produce(&self) -> Result<Snapshot, ProducerError>;
}
