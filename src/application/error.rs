//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::CompileError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("unsupported document format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid tree document {path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
