//! # Design
//!
//! - Provide structured errors for the copy pipeline, one variant per failure kind.
//! - Capture operation context (paths, sizes) so failures are reproducible in tests.
//! - Preserve source errors so callers can render the full chain.

use std::io;
use std::path::PathBuf;

use randcopy_config::ConfigError;
use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced by the copy pipeline.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// Settings failed validation.
    #[error("invalid settings")]
    Config {
        /// Underlying validation error.
        #[from]
        source: ConfigError,
    },
    /// A required directory does not exist or is not a directory.
    #[error("no such {role} directory: {}", path.display())]
    DirectoryNotFound {
        /// Which directory was missing (`source` or `destination`).
        role: &'static str,
        /// Path that was checked.
        path: PathBuf,
    },
    /// Free space of the destination could not be queried.
    #[error("failed to query free space of {}", path.display())]
    Environment {
        /// Path handed to the platform query.
        path: PathBuf,
        /// Underlying platform error.
        source: io::Error,
    },
    /// The requested size budget is larger than the destination's free space.
    #[error(
        "not enough free space in destination directory: {requested} bytes requested, {available} bytes available"
    )]
    InsufficientSpace {
        /// Requested byte budget.
        requested: u64,
        /// Bytes available at probe time.
        available: u64,
    },
    /// The scan matched no files.
    #[error("no .{extension} files found under {}", root.display())]
    EmptyResult {
        /// Root of the scan.
        root: PathBuf,
        /// Extension that was matched.
        extension: String,
    },
    /// Copying one file into the destination failed.
    #[error("failed to copy {} to {}", from.display(), to.display())]
    Copy {
        /// File being copied.
        from: PathBuf,
        /// Destination path being written.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// IO failures while interacting with the filesystem.
    #[error("failed to {operation} {}", path.display())]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Coarse classification of [`FsOpsError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOpsErrorKind {
    /// Missing or invalid settings.
    Configuration,
    /// Source or destination directory absent.
    NotFound,
    /// The platform could not answer an environment query.
    Environment,
    /// Requested budget exceeds free space.
    InsufficientSpace,
    /// Scan found nothing to copy.
    EmptyResult,
    /// Read, write, or stat failure.
    Io,
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> FsOpsErrorKind {
        match self {
            Self::Config { .. } => FsOpsErrorKind::Configuration,
            Self::DirectoryNotFound { .. } => FsOpsErrorKind::NotFound,
            Self::Environment { .. } => FsOpsErrorKind::Environment,
            Self::InsufficientSpace { .. } => FsOpsErrorKind::InsufficientSpace,
            Self::EmptyResult { .. } => FsOpsErrorKind::EmptyResult,
            Self::Copy { .. } | Self::Io { .. } => FsOpsErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_helper_keeps_source_and_context() {
        let err = FsOpsError::io("copy", "/music/a.mp3", io::Error::other("disk"));
        assert_eq!(err.kind(), FsOpsErrorKind::Io);
        assert_eq!(err.to_string(), "failed to copy /music/a.mp3");
        assert!(err.source().is_some());
    }

    #[test]
    fn kinds_cover_every_variant() {
        let config: FsOpsError = ConfigError::InvalidField {
            field: "size",
            value: None,
            reason: "must be at least 1",
        }
        .into();
        let cases = [
            (config, FsOpsErrorKind::Configuration),
            (
                FsOpsError::DirectoryNotFound {
                    role: "source",
                    path: PathBuf::from("/missing"),
                },
                FsOpsErrorKind::NotFound,
            ),
            (
                FsOpsError::Environment {
                    path: PathBuf::from("/stick"),
                    source: io::Error::other("statvfs"),
                },
                FsOpsErrorKind::Environment,
            ),
            (
                FsOpsError::InsufficientSpace {
                    requested: 10,
                    available: 5,
                },
                FsOpsErrorKind::InsufficientSpace,
            ),
            (
                FsOpsError::EmptyResult {
                    root: PathBuf::from("/music"),
                    extension: "mp3".to_string(),
                },
                FsOpsErrorKind::EmptyResult,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn messages_name_the_offending_paths() {
        let missing = FsOpsError::DirectoryNotFound {
            role: "destination",
            path: PathBuf::from("/media/stick"),
        };
        assert_eq!(
            missing.to_string(),
            "no such destination directory: /media/stick"
        );

        let empty = FsOpsError::EmptyResult {
            root: PathBuf::from("/music"),
            extension: "mp3".to_string(),
        };
        assert_eq!(empty.to_string(), "no .mp3 files found under /music");

        let copy = FsOpsError::Copy {
            from: PathBuf::from("/music/a.mp3"),
            to: PathBuf::from("/media/stick/0000 - a.mp3"),
            source: io::Error::other("no space left on device"),
        };
        assert_eq!(copy.kind(), FsOpsErrorKind::Io);
        assert_eq!(
            copy.to_string(),
            "failed to copy /music/a.mp3 to /media/stick/0000 - a.mp3"
        );
    }
}
