#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Random copy pipeline: scan a music library, shuffle the matches, and copy
//! them into a destination until a size or file-count budget is used up.
//!
//! The pipeline runs synchronously and fails fast. Progress is reported as
//! [`TransferEvent`] values through a caller supplied [`ProgressSink`].

pub mod copier;
pub mod error;
pub mod events;
pub mod model;
pub mod probe;
pub mod scanner;
pub mod selector;
pub mod service;

pub use copier::{Copier, CopyLayout};
pub use error::{FsOpsError, FsOpsErrorKind, FsOpsResult};
pub use events::{NullSink, ProgressSink, TransferEvent};
pub use model::{
    Candidate, CopiedFile, CopyOutcome, StopReason, TransferBudget, TransferReport, TransferState,
};
#[cfg(unix)]
pub use probe::StatvfsProbe;
pub use probe::{FixedSpaceProbe, MountTableProbe, SpaceProbe, default_probe};
pub use scanner::{ScanFilter, ScanOutcome, scan_library};
pub use selector::{selection_rng, shuffle_candidates};
pub use service::RandomCopyService;
