//! Recursive library scan.
//!
//! # Design
//! - Follow symbolic links; walkdir reports loops as errors, which are skipped.
//! - Exclude patterns apply to every path segment, the root's own included.
//! - Prune excluded directories before descending into them.
//! - Sort siblings by name so a seeded shuffle is reproducible on the same tree.

use std::io;
use std::path::{Component, Path};

use randcopy_config::CopySettings;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::Candidate;

/// Extension and exclude rules applied during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    extension: String,
    excludes: Vec<String>,
}

impl ScanFilter {
    /// Build a filter; matching is case-insensitive and a leading dot on the
    /// extension is ignored.
    #[must_use]
    pub fn new<S: AsRef<str>>(extension: &str, excludes: &[S]) -> Self {
        Self {
            extension: extension.trim().trim_start_matches('.').to_lowercase(),
            excludes: excludes
                .iter()
                .map(|pattern| pattern.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Filter described by run settings.
    #[must_use]
    pub fn from_settings(settings: &CopySettings) -> Self {
        Self::new(settings.normalized_extension(), settings.excludes.as_slice())
    }

    /// Extension matched by this filter, lowercased and without a dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether `name` contains any exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.excludes
            .iter()
            .any(|pattern| name.contains(pattern.as_str()))
    }

    /// First segment of `path` that contains an exclude pattern.
    #[must_use]
    pub fn excluded_segment(&self, path: &Path) -> Option<String> {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .find(|segment| self.is_excluded(segment))
    }

    /// Whether `path` carries the filter's extension.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.to_lowercase() == self.extension)
    }
}

/// Files found by [`scan_library`] plus traversal counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Matching files, in traversal order.
    pub candidates: Vec<Candidate>,
    /// Regular files visited.
    pub files_seen: u64,
    /// Files skipped because their name matched an exclude pattern.
    pub files_excluded: u64,
    /// Directories skipped with their whole subtree.
    pub dirs_pruned: u64,
}

/// Walk `root` and collect every file accepted by `filter`.
///
/// # Errors
///
/// - [`FsOpsError::DirectoryNotFound`] when `root` is not a directory.
/// - [`FsOpsError::Io`] when `root` itself cannot be read.
/// - [`FsOpsError::EmptyResult`] when nothing matched, including when the
///   root path itself contains an excluded segment.
pub fn scan_library(root: &Path, filter: &ScanFilter) -> FsOpsResult<ScanOutcome> {
    if !root.is_dir() {
        return Err(FsOpsError::DirectoryNotFound {
            role: "source",
            path: root.to_path_buf(),
        });
    }
    if let Some(segment) = filter.excluded_segment(root) {
        debug!(root = %root.display(), segment, "scan root is excluded");
        return Err(FsOpsError::EmptyResult {
            root: root.to_path_buf(),
            extension: filter.extension().to_string(),
        });
    }

    let mut candidates = Vec::new();
    let mut files_seen = 0_u64;
    let mut files_excluded = 0_u64;
    let mut dirs_pruned = 0_u64;

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let excluded = filter.is_excluded(&entry.file_name().to_string_lossy());
            if excluded {
                dirs_pruned += 1;
                debug!(path = %entry.path().display(), "pruned excluded directory");
            }
            !excluded
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(FsOpsError::io(
                    "read directory",
                    root,
                    io::Error::from(err),
                ));
            }
            Err(err) => {
                warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable entry during scan"
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        files_seen += 1;
        if filter.is_excluded(&entry.file_name().to_string_lossy()) {
            files_excluded += 1;
            continue;
        }
        if filter.matches_extension(entry.path()) {
            candidates.push(Candidate::new(entry.into_path()));
        }
    }

    debug!(
        root = %root.display(),
        matched = candidates.len(),
        files_seen,
        files_excluded,
        dirs_pruned,
        "library scan finished"
    );

    if candidates.is_empty() {
        return Err(FsOpsError::EmptyResult {
            root: root.to_path_buf(),
            extension: filter.extension().to_string(),
        });
    }

    Ok(ScanOutcome {
        candidates,
        files_seen,
        files_excluded,
        dirs_pruned,
    })
}
