//! CLI command implementations

pub mod error;
pub mod mirror;

pub use error::CliError;
pub use mirror::{Cli, Commands, ListArgs, MirrorArgs};
