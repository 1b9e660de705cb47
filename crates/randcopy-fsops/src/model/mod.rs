//! Domain models for the copy pipeline.
//!
//! # Design
//! - Keep request/response types lightweight; no IO handles are embedded.
//! - Budget checks live next to the budget so the copier reads as a plain loop.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use randcopy_config::BYTES_PER_MEGABYTE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FsOpsError, FsOpsResult};

/// A discovered file eligible for copying.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    path: PathBuf,
}

impl Candidate {
    /// Wrap a discovered path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Current size of the file in bytes, following symbolic links.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::Io`] when the file cannot be stat'ed.
    pub fn size(&self) -> FsOpsResult<u64> {
        fs::metadata(&self.path)
            .map(|metadata| metadata.len())
            .map_err(|source| FsOpsError::io("read metadata of", &self.path, source))
    }
}

/// Byte and file-count ceilings for one run. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBudget {
    /// Maximum cumulative bytes to copy.
    pub max_total_bytes: Option<u64>,
    /// Maximum number of files to copy.
    pub max_file_count: Option<u64>,
}

impl TransferBudget {
    /// Budget without any ceiling.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_total_bytes: None,
            max_file_count: None,
        }
    }

    /// Combine user limits with the probed free space.
    ///
    /// Without a requested size the free space becomes the byte ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InsufficientSpace`] when the requested size exceeds
    /// `available_bytes`.
    pub fn resolve(
        requested_bytes: Option<u64>,
        max_file_count: Option<u64>,
        available_bytes: u64,
    ) -> FsOpsResult<Self> {
        let max_total_bytes = match requested_bytes {
            Some(requested) if requested > available_bytes => {
                return Err(FsOpsError::InsufficientSpace {
                    requested,
                    available: available_bytes,
                });
            }
            Some(requested) => requested,
            None => available_bytes,
        };
        Ok(Self {
            max_total_bytes: Some(max_total_bytes),
            max_file_count,
        })
    }

    /// Whether adding `size` to `bytes_copied` stays within the byte ceiling.
    #[must_use]
    pub const fn admits(&self, bytes_copied: u64, size: u64) -> bool {
        match self.max_total_bytes {
            Some(limit) => match bytes_copied.checked_add(size) {
                Some(total) => total <= limit,
                None => false,
            },
            None => true,
        }
    }

    /// Whether `files_copied` has used up the file-count ceiling.
    #[must_use]
    pub const fn file_limit_reached(&self, files_copied: u64) -> bool {
        match self.max_file_count {
            Some(limit) => files_copied >= limit,
            None => false,
        }
    }
}

/// Running counters of a copy loop. Values never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferState {
    /// Bytes copied so far.
    pub bytes_copied: u64,
    /// Files copied so far.
    pub files_copied: u64,
    /// Index of the batch folder the next file lands in.
    pub folder_index: u64,
}

impl TransferState {
    /// Count one more copied file of `size` bytes.
    pub const fn record(&mut self, size: u64) {
        self.bytes_copied += size;
        self.files_copied += 1;
    }

    /// Whole megabytes copied, rounded down.
    #[must_use]
    pub const fn megabytes_copied(&self) -> u64 {
        self.bytes_copied / BYTES_PER_MEGABYTE
    }
}

/// Why the copy loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The next file would have exceeded the byte ceiling.
    DestinationFull,
    /// The file-count ceiling was reached.
    FileLimitReached,
    /// Every selected candidate was copied.
    SelectionExhausted,
}

impl StopReason {
    /// Machine-friendly name of the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DestinationFull => "destination_full",
            Self::FileLimitReached => "file_limit_reached",
            Self::SelectionExhausted => "selection_exhausted",
        }
    }
}

/// One file written (or, in a dry run, planned) by the copier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFile {
    /// File that was read.
    pub source: PathBuf,
    /// File that was written.
    pub destination: PathBuf,
    /// Bytes copied.
    pub size_bytes: u64,
}

/// Result of the copy loop alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Final counters.
    pub state: TransferState,
    /// Why the loop ended.
    pub stop_reason: StopReason,
    /// Files in copy order.
    pub files: Vec<CopiedFile>,
}

/// Summary of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Identifier attached to this run's log events.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the copy loop ended.
    pub finished_at: DateTime<Utc>,
    /// Whether the destination was left untouched.
    pub dry_run: bool,
    /// Scanned library root.
    pub source_dir: PathBuf,
    /// Destination root.
    pub dest_dir: PathBuf,
    /// Free space reported by the probe.
    pub available_bytes: u64,
    /// Ceilings the copier enforced.
    pub budget: TransferBudget,
    /// Number of files the scan matched.
    pub candidates: usize,
    /// Final counters.
    pub state: TransferState,
    /// Why the copy loop ended.
    pub stop_reason: StopReason,
    /// Files in copy order.
    pub files: Vec<CopiedFile>,
}

impl TransferReport {
    /// Whole megabytes copied, rounded down.
    #[must_use]
    pub const fn megabytes_copied(&self) -> u64 {
        self.state.megabytes_copied()
    }
}
