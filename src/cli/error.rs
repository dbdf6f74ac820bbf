//! CLI-level errors (wraps parser errors)

use thiserror::Error;

use crate::errors::GedError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Ged(#[from] GedError),

    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Json(_) => crate::exitcode::SOFTWARE,
            CliError::Io(_) => crate::exitcode::IOERR,
            CliError::Ged(e) => match e {
                GedError::FileNotFound(_) => crate::exitcode::NOINPUT,
                GedError::FileReadError(_) => crate::exitcode::IOERR,
            },
        }
    }
}
