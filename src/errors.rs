use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GedError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read input: {0}")]
    FileReadError(#[from] std::io::Error),
}

pub type GedResult<T> = Result<T, GedError>;
