//! Budgeted copy loop.
//!
//! # Design
//! - Fail fast: the first IO error aborts the run.
//! - Destination names carry a zero-padded sequence number, so two sources
//!   with the same base name never collide within a run.
//! - Dry runs compute and report every destination without touching disk.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use randcopy_config::CopySettings;
use tracing::{debug, info};

use crate::error::{FsOpsError, FsOpsResult};
use crate::events::{ProgressSink, TransferEvent};
use crate::model::{Candidate, CopiedFile, CopyOutcome, StopReason, TransferBudget, TransferState};

/// How copied files are arranged under the destination root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLayout {
    /// Every file directly in the destination root.
    Flat,
    /// Files grouped into numbered batch folders of `files_per_folder` entries.
    Batched {
        /// Files per batch folder; must be at least 1.
        files_per_folder: u64,
    },
}

impl CopyLayout {
    /// Layout described by run settings.
    #[must_use]
    pub const fn from_settings(settings: &CopySettings) -> Self {
        if settings.use_folders {
            Self::Batched {
                files_per_folder: settings.folder_file_limit,
            }
        } else {
            Self::Flat
        }
    }

    const fn folder_index(self, files_copied: u64) -> Option<u64> {
        match self {
            Self::Flat => None,
            Self::Batched { files_per_folder } if files_per_folder == 0 => Some(0),
            Self::Batched { files_per_folder } => Some(files_copied / files_per_folder),
        }
    }
}

/// Copies a selection order into a destination directory.
#[derive(Debug, Clone)]
pub struct Copier {
    dest_root: PathBuf,
    layout: CopyLayout,
    dry_run: bool,
}

impl Copier {
    /// Copier writing below `dest_root`.
    #[must_use]
    pub fn new(dest_root: impl Into<PathBuf>, layout: CopyLayout, dry_run: bool) -> Self {
        Self {
            dest_root: dest_root.into(),
            layout,
            dry_run,
        }
    }

    /// Copier described by run settings.
    #[must_use]
    pub fn from_settings(settings: &CopySettings) -> Self {
        Self::new(
            &settings.dest_dir,
            CopyLayout::from_settings(settings),
            settings.dry_run,
        )
    }

    /// Folder and file path for the next file given the counters so far.
    #[must_use]
    pub fn destination_for(&self, state: &TransferState, file_name: &OsStr) -> PathBuf {
        let mut name = OsString::from(format!("{:04} - ", state.files_copied));
        name.push(file_name);
        match self.layout.folder_index(state.files_copied) {
            Some(index) => self.dest_root.join(format!("{index:04}")).join(name),
            None => self.dest_root.join(name),
        }
    }

    /// Walk `selection` in order until a budget ceiling or the end of the
    /// selection is reached.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::Io`] for the first file that cannot be stat'ed,
    /// copied, or touched; nothing after it is attempted.
    pub fn copy(
        &self,
        selection: &[Candidate],
        budget: &TransferBudget,
        sink: &mut dyn ProgressSink,
    ) -> FsOpsResult<CopyOutcome> {
        let mut state = TransferState::default();
        let mut files = Vec::new();
        let mut stop_reason = StopReason::SelectionExhausted;

        for candidate in selection {
            let size = candidate.size()?;
            if !budget.admits(state.bytes_copied, size) {
                stop_reason = StopReason::DestinationFull;
                break;
            }
            if budget.file_limit_reached(state.files_copied) {
                stop_reason = StopReason::FileLimitReached;
                break;
            }

            let file_name = candidate.file_name().ok_or_else(|| {
                FsOpsError::io(
                    "resolve file name of",
                    candidate.path(),
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?;
            if let Some(index) = self.layout.folder_index(state.files_copied) {
                state.folder_index = index;
            }
            let destination = self.destination_for(&state, file_name);
            self.write(candidate.path(), &destination)?;

            state.record(size);
            debug!(
                source = %candidate.path().display(),
                destination = %destination.display(),
                size,
                dry_run = self.dry_run,
                "copied file"
            );
            let copied = CopiedFile {
                source: candidate.path().to_path_buf(),
                destination,
                size_bytes: size,
            };
            sink.emit(TransferEvent::FileCopied(copied.clone()));
            files.push(copied);
        }

        info!(
            reason = stop_reason.as_str(),
            files = state.files_copied,
            bytes = state.bytes_copied,
            "copy loop finished"
        );
        sink.emit(TransferEvent::Stopped {
            reason: stop_reason,
        });
        Ok(CopyOutcome {
            state,
            stop_reason,
            files,
        })
    }

    fn write(&self, source: &Path, destination: &Path) -> FsOpsResult<()> {
        if self.dry_run {
            return Ok(());
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| FsOpsError::io("create directory", parent, err))?;
        }
        fs::copy(source, destination).map_err(|err| FsOpsError::Copy {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: err,
        })?;
        filetime::set_file_mtime(destination, FileTime::now())
            .map_err(|err| FsOpsError::io("update modification time of", destination, err))?;
        Ok(())
    }
}
