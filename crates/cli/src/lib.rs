//! Snapkeep CLI library
//!
//! Command implementations, configuration loading and output rendering for
//! the `snapkeep` binary.

pub mod cmd;
pub mod config;
pub mod logging;
pub mod output;
pub mod util;
