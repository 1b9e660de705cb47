//! Typed settings for a single copy run.
//!
//! # Design
//! - Pure data carrier built by the CLI and consumed by the fsops pipeline.
//! - Optional limits stay `None` until the pipeline resolves them against the
//!   destination's free space.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults::{BYTES_PER_MEGABYTE, DEFAULT_EXTENSION, DEFAULT_FOLDER_FILE_LIMIT};
use crate::error::{ConfigError, ConfigResult};
use crate::validate;

/// Every option that shapes one randcopy invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopySettings {
    /// Root of the library to pick files from.
    pub source_dir: PathBuf,
    /// Existing directory the selection is copied into.
    pub dest_dir: PathBuf,
    /// Total size budget in megabytes; `None` fills the destination.
    pub size_mb: Option<u64>,
    /// Maximum number of files to copy; `None` copies until the size budget runs out.
    pub max_files: Option<u64>,
    /// Nest copied files into numbered batch folders.
    pub use_folders: bool,
    /// Files stored in each batch folder.
    pub folder_file_limit: u64,
    /// Case-insensitive substrings that exclude directories and files.
    pub excludes: Vec<String>,
    /// Extension of the files to pick, with or without a leading dot.
    pub extension: String,
    /// Report what would be copied without touching the destination.
    pub dry_run: bool,
    /// Seed for a reproducible selection order.
    pub seed: Option<u64>,
}

impl CopySettings {
    /// Settings with every optional feature switched off.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            size_mb: None,
            max_files: None,
            use_folders: false,
            folder_file_limit: DEFAULT_FOLDER_FILE_LIMIT,
            excludes: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            dry_run: false,
            seed: None,
        }
    }

    /// Extension without its leading dot.
    #[must_use]
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }

    /// Requested size budget converted to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the megabyte value does not
    /// fit in a 64-bit byte count.
    pub fn requested_bytes(&self) -> ConfigResult<Option<u64>> {
        self.size_mb
            .map(|megabytes| {
                megabytes.checked_mul(BYTES_PER_MEGABYTE).ok_or_else(|| {
                    ConfigError::invalid("size", megabytes, "exceeds the addressable byte range")
                })
            })
            .transpose()
    }

    /// Check every field, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate_settings(self)
    }
}
