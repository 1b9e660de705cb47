//! Temporary directory trees for pipeline tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use walkdir::WalkDir;

/// One mebibyte, the unit behind the `--size` flag.
pub const MIB: u64 = 1024 * 1024;

/// Temporary directory populated with files of chosen sizes.
///
/// The directory is removed when the value is dropped.
#[derive(Debug)]
pub struct LibraryTree {
    root: TempDir,
}

impl LibraryTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let root = TempDir::new().context("failed to create temporary library")?;
        Ok(Self { root })
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Create `relative` (and its parents) holding exactly `size_bytes` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be written.
    pub fn add_file(&self, relative: &str, size_bytes: u64) -> Result<PathBuf> {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(relative.as_bytes())?;
        file.set_len(size_bytes)?;
        Ok(path)
    }

    /// Create the directory `relative` (and its parents).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn add_dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root.path().join(relative);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(path)
    }
}

/// Number of entries (files and directories) below `root`, excluding `root`.
///
/// # Errors
///
/// Returns an error if any part of the tree cannot be read.
pub fn entry_count(root: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root).min_depth(1) {
        entry.with_context(|| format!("failed to walk {}", root.display()))?;
        count += 1;
    }
    Ok(count)
}

/// Files below `root` as sorted `/`-separated relative paths.
///
/// # Errors
///
/// Returns an error if any part of the tree cannot be read.
pub fn relative_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(root)?;
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(files)
}
