//! End-to-end copy pipeline: validate, probe, scan, shuffle, copy.

use std::path::Path;

use chrono::Utc;
use rand::Rng;
use randcopy_config::CopySettings;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::copier::Copier;
use crate::error::{FsOpsError, FsOpsResult};
use crate::events::{ProgressSink, TransferEvent};
use crate::model::{TransferBudget, TransferReport};
use crate::probe::{SpaceProbe, default_probe};
use crate::scanner::{ScanFilter, scan_library};
use crate::selector::shuffle_candidates;

/// Runs one random copy with an injected free-space probe.
pub struct RandomCopyService {
    probe: Box<dyn SpaceProbe>,
}

impl std::fmt::Debug for RandomCopyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomCopyService").finish_non_exhaustive()
    }
}

impl Default for RandomCopyService {
    fn default() -> Self {
        Self::new(default_probe())
    }
}

impl RandomCopyService {
    /// Service using `probe` for destination free space.
    #[must_use]
    pub fn new(probe: Box<dyn SpaceProbe>) -> Self {
        Self { probe }
    }

    /// Execute the pipeline described by `settings`.
    ///
    /// Progress is delivered to `sink` in order; `rng` drives the shuffle.
    ///
    /// # Errors
    ///
    /// Fails before touching the destination when settings are invalid, a
    /// directory is missing, free space cannot be queried or is smaller than
    /// the requested size, or the scan finds nothing. Fails mid-run on the
    /// first IO error while copying.
    pub fn run<R: Rng + ?Sized>(
        &self,
        settings: &CopySettings,
        sink: &mut dyn ProgressSink,
        rng: &mut R,
    ) -> FsOpsResult<TransferReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("random_copy", %run_id, dry_run = settings.dry_run);
        let _guard = span.enter();
        let started_at = Utc::now();

        settings.validate()?;
        let requested = settings.requested_bytes()?;
        ensure_dir(&settings.source_dir, "source")?;
        ensure_dir(&settings.dest_dir, "destination")?;

        let available = self.probe.available_bytes(&settings.dest_dir)?;
        let budget = TransferBudget::resolve(requested, settings.max_files, available)?;
        info!(
            available,
            max_bytes = budget.max_total_bytes,
            max_files = budget.max_file_count,
            "resolved transfer budget"
        );

        sink.emit(TransferEvent::Scanning {
            root: settings.source_dir.clone(),
        });
        let filter = ScanFilter::from_settings(settings);
        let scan = scan_library(&settings.source_dir, &filter)?;
        let candidates = scan.candidates.len();

        let selection = shuffle_candidates(scan.candidates, rng);
        sink.emit(TransferEvent::Copying { candidates });
        let outcome = Copier::from_settings(settings).copy(&selection, &budget, sink)?;

        let report = TransferReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            dry_run: settings.dry_run,
            source_dir: settings.source_dir.clone(),
            dest_dir: settings.dest_dir.clone(),
            available_bytes: available,
            budget,
            candidates,
            state: outcome.state,
            stop_reason: outcome.stop_reason,
            files: outcome.files,
        };
        info!(
            files = report.state.files_copied,
            megabytes = report.megabytes_copied(),
            reason = report.stop_reason.as_str(),
            "random copy finished"
        );
        Ok(report)
    }
}

fn ensure_dir(path: &Path, role: &'static str) -> FsOpsResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(FsOpsError::DirectoryNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}
