//! Command line interface.

mod commands;

pub use commands::{AddArgs, Cli, Commands, run};
