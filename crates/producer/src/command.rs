//! Dump commands as argument lists

use std::fmt;

/// A dump program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpCommand {
    program: String,
    args: Vec<String>,
}

impl DumpCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Plain SQL dump of the whole cluster
    pub fn dump_all() -> Self {
        Self::new("pg_dumpall", Vec::<String>::new())
    }

    /// Custom-format (self-compressing) dump of a single database
    pub fn dump_database(database: &str) -> Self {
        Self::new("pg_dump", ["--format=custom", "--", database])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for DumpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv: Vec<_> = self.argv().collect();
        f.write_str(&argv.join(" "))
    }
}
