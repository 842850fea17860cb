//! Narwhal CLI application: one subcommand per common endpoint, configured
//! from a TOML file.

pub use cmd::{Cli, Command};

pub mod cmd;
