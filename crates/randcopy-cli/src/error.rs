//! CLI error wrapper and exit codes.

use std::fmt::{self, Display, Formatter};

use randcopy_fsops::{FsOpsError, FsOpsErrorKind};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Failure(_) => 1,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<FsOpsError> for CliError {
    fn from(err: FsOpsError) -> Self {
        match err {
            FsOpsError::Config { source } => Self::validation(source.to_string()),
            other if other.kind() == FsOpsErrorKind::InsufficientSpace => {
                Self::validation(other.to_string())
            }
            other => Self::failure(other),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn every_error_exits_with_one() {
        assert_eq!(CliError::validation("bad").exit_code(), 1);
        assert_eq!(CliError::failure(anyhow::anyhow!("boom")).exit_code(), 1);
    }

    #[test]
    fn failure_message_includes_source_chain() {
        let err = CliError::from(FsOpsError::Io {
            operation: "copy",
            path: "/music/a.mp3".into(),
            source: io::Error::other("device removed"),
        });
        assert!(matches!(err, CliError::Failure(_)));
        assert_eq!(
            err.display_message(),
            "failed to copy /music/a.mp3: device removed"
        );
    }

    #[test]
    fn configuration_and_space_problems_are_validation_errors() {
        let config = randcopy_config::CopySettings {
            folder_file_limit: 0,
            ..randcopy_config::CopySettings::new("/music", "/stick")
        };
        let Err(source) = config.validate() else {
            panic!("zero folder limit must be rejected");
        };
        let err = CliError::from(FsOpsError::from(source));
        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.display_message().contains("folder_file_limit"));

        let err = CliError::from(FsOpsError::InsufficientSpace {
            requested: 10,
            available: 5,
        });
        assert!(matches!(err, CliError::Validation(_)));
    }
}
