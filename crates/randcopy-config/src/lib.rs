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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Run settings for a randcopy invocation.
//!
//! Layout: `model.rs` (typed settings), `defaults.rs` (constants shared with
//! the CLI), `validate.rs` (field checks), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod model;
pub mod validate;

pub use defaults::{BYTES_PER_MEGABYTE, DEFAULT_EXTENSION, DEFAULT_FOLDER_FILE_LIMIT};
pub use error::{ConfigError, ConfigResult};
pub use model::CopySettings;
