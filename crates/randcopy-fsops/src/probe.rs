//! Free-space queries for the destination filesystem.
//!
//! # Design
//! - One capability trait; the platform implementation is picked at compile
//!   time by [`default_probe`] and injected into the service.
//! - Unix asks `statvfs(2)` about the path directly. Other hosts look the path
//!   up in the mount table and report that filesystem's free space.

use std::io;
use std::path::{Path, PathBuf};

use systemstat::{Platform, System};
use tracing::debug;

use crate::error::{FsOpsError, FsOpsResult};

/// Capability to report free space available at a path.
pub trait SpaceProbe {
    /// Bytes available to unprivileged writers on the filesystem holding `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::Environment`] when the platform query fails.
    fn available_bytes(&self, path: &Path) -> FsOpsResult<u64>;
}

/// `statvfs(2)` backed probe.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsProbe;

#[cfg(unix)]
impl SpaceProbe for StatvfsProbe {
    // Block counter widths differ between unix targets.
    #[allow(clippy::useless_conversion)]
    fn available_bytes(&self, path: &Path) -> FsOpsResult<u64> {
        let stat = nix::sys::statvfs::statvfs(path)
            .map_err(|errno| environment(path, io::Error::from(errno)))?;
        let blocks = u64::from(stat.blocks_available());
        let fragment = u64::from(stat.fragment_size());
        let available = blocks.saturating_mul(fragment);
        debug!(path = %path.display(), blocks, fragment, available, "queried free space");
        Ok(available)
    }
}

/// Probe backed by the host mount table; works on every platform `systemstat`
/// supports, including Windows drive letters.
#[derive(Debug, Default, Clone, Copy)]
pub struct MountTableProbe;

impl SpaceProbe for MountTableProbe {
    fn available_bytes(&self, path: &Path) -> FsOpsResult<u64> {
        let target = std::path::absolute(path).map_err(|err| environment(path, err))?;
        let mounts = System::new()
            .mounts()
            .map_err(|err| environment(path, err))?;
        let mounted_on = mounts
            .iter()
            .map(|mount| (PathBuf::from(&mount.fs_mounted_on), mount.avail.as_u64()));
        let (mount, available) = deepest_mount(&target, mounted_on).ok_or_else(|| {
            environment(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no mounted filesystem holds this path"),
            )
        })?;
        debug!(path = %path.display(), mount = %mount.display(), available, "queried free space");
        Ok(available)
    }
}

/// Mount point with the most components that is a prefix of `target`.
fn deepest_mount(
    target: &Path,
    mounts: impl IntoIterator<Item = (PathBuf, u64)>,
) -> Option<(PathBuf, u64)> {
    mounts
        .into_iter()
        .filter(|(mount, _)| target.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
}

fn environment(path: &Path, source: io::Error) -> FsOpsError {
    FsOpsError::Environment {
        path: path.to_path_buf(),
        source,
    }
}

/// Probe that reports a fixed number of bytes regardless of path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSpaceProbe {
    available: u64,
}

impl FixedSpaceProbe {
    /// Report `available` bytes for every path.
    #[must_use]
    pub const fn new(available: u64) -> Self {
        Self { available }
    }
}

impl SpaceProbe for FixedSpaceProbe {
    fn available_bytes(&self, _path: &Path) -> FsOpsResult<u64> {
        Ok(self.available)
    }
}

/// Probe matching the host platform.
#[must_use]
pub fn default_probe() -> Box<dyn SpaceProbe> {
    #[cfg(unix)]
    {
        Box::new(StatvfsProbe)
    }
    #[cfg(not(unix))]
    {
        Box::new(MountTableProbe)
    }
}
