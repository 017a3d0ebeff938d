//! Snapshots from an external dump program

use crate::command::DumpCommand;
use crate::compress::Compression;
use crate::transport::Transport;
use crate::{ProducerError, Snapshot, SnapshotProducer};
use std::process::Stdio;
use tracing::{debug, info};

/// Runs a dump command and encodes its standard output
///
/// A dump only counts as successful if the process exits with status zero
/// and writes at least one byte. Anything else is an error and nothing is
/// returned to write.
#[derive(Debug, Clone)]
pub struct DumpProducer {
    command: DumpCommand,
    transport: Transport,
    compression: Compression,
}

impl DumpProducer {
    pub fn new(command: DumpCommand, transport: Transport, compression: Compression) -> Self {
        Self {
            command,
            transport,
            compression,
        }
    }

    pub fn command(&self) -> &DumpCommand {
        &self.command
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl SnapshotProducer for DumpProducer {
    fn compression(&self) -> Compression {
        self.compression
    }

    fn produce(&self) -> Result<Snapshot, ProducerError> {
        let program = self.command.program().to_string();
        let mut process = self.transport.command(&self.command)?;
        debug!("running {:?}", process);

        let output = process
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProducerError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProducerError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        if output.stdout.is_empty() {
            return Err(ProducerError::EmptyOutput { program });
        }

        let dump_len = output.stdout.len();
        let bytes = self
            .compression
            .encode(output.stdout)
            .map_err(ProducerError::Compress)?;
        info!("{} produced {} bytes ({} stored)", program, dump_len, bytes.len());

        Ok(Snapshot { bytes, dump_len })
    }
}
