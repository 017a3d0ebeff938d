//! Where and as whom a dump command runs
//!
//! Local and other-user transports pass the argument list straight through.
//! SSH is the one place a command line has to cross a shell (the remote
//! login shell), so quoting happens here and nowhere else.

use crate::command::DumpCommand;
use crate::ProducerError;
use std::process::Command;

/// How to reach the database host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    /// Run on this machine as the current user
    #[default]
    Local,
    /// Run on this machine as another system user (via sudo)
    AsUser(String),
    /// Run on a remote host over SSH
    Ssh(String),
}

impl Transport {
    /// Full argument list that runs `dump` over this transport
    pub fn argv(&self, dump: &DumpCommand) -> Result<Vec<String>, ProducerError> {
        let inner = dump.argv().map(str::to_string);

        let argv = match self {
            Transport::Local => inner.collect(),
            Transport::AsUser(user) => {
                validate("user", user)?;
                ["sudo", "-n", "-H", "-u", user.as_str(), "--"]
                    .into_iter()
                    .map(str::to_string)
                    .chain(inner)
                    .collect()
            }
            Transport::Ssh(host) => {
                validate("remote host", host)?;
                let remote = dump.argv().map(quote).collect::<Vec<_>>().join(" ");
                vec![
                    "ssh".to_string(),
                    "-T".to_string(),
                    "-o".to_string(),
                    "BatchMode=yes".to_string(),
                    "--".to_string(),
                    host.clone(),
                    remote,
                ]
            }
        };

        Ok(argv)
    }

    /// Build the process for `dump`
    pub fn command(&self, dump: &DumpCommand) -> Result<Command, ProducerError> {
        let argv = self.argv(dump)?;
        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);
        Ok(command)
    }
}

/// Reject values that ssh or sudo could read as options
fn validate(what: &'static str, value: &str) -> Result<(), ProducerError> {
    let bad = value.is_empty()
        || value.starts_with('-')
        || value.chars().any(|c| c.is_whitespace() || c.is_control());
    if bad {
        return Err(ProducerError::InvalidTarget {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Quote one argument for a POSIX shell
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
