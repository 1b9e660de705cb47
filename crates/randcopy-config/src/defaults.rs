//! Default values for run settings.
//!
//! # Design
//! - Keep CLI defaults and library defaults on the same constants.

/// File extension matched when none is supplied.
pub const DEFAULT_EXTENSION: &str = "mp3";
/// Files stored in each batch folder when folder batching is enabled.
pub const DEFAULT_FOLDER_FILE_LIMIT: u64 = 20;
/// Bytes in one megabyte as used by `--size` and the run summary.
pub const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;
