//! Error type of the command-line application.

use crate::config::ConfigError;
use gradebook_core::GradebookError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] GradebookError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input the store would accept but the CLI refuses (bad grade value,
    /// unparsable date, duplicate id, existing data file).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// A record required by the command does not exist.
    pub fn not_found(record: &'static str, id: u64) -> Self {
        Self::Core(GradebookError::NotFound { record, id })
    }
}
