//! CLI error types and conversions

use crate::mirror::MirrorError;
use crate::mirror::SchedulerError;
use crate::remote::RemoteError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Mirror error
    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),

    /// Remote error
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Scheduler error
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
