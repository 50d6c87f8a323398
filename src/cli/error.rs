//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),

    #[error("{failed} of {total} document(s) failed to compile")]
    CheckFailed { failed: usize, total: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::CheckFailed { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Serialize { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::Compile(_)
                    | ApplicationError::InvalidDocument { .. }
                    | ApplicationError::UnsupportedFormat(_) => crate::exitcode::DATAERR,
                    ApplicationError::DocumentNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompileError, NodePath};

    #[test]
    fn given_compile_error_when_exit_code_then_dataerr() {
        let err: CliError = ApplicationError::Compile(CompileError::EmptyContainer {
            name: "doc".to_string(),
            path: NodePath::root(),
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_missing_document_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::DocumentNotFound("x.json".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_usage_and_failed_check_when_exit_code_then_usage_and_dataerr() {
        assert_eq!(
            CliError::Usage("no path".to_string()).exit_code(),
            crate::exitcode::USAGE
        );
        let failed = CliError::CheckFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(failed.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(failed.to_string(), "1 of 3 document(s) failed to compile");
    }
}
