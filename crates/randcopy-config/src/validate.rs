//! Validation helpers for run settings.

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::CopySettings;

pub(crate) fn validate_settings(settings: &CopySettings) -> ConfigResult<()> {
    if settings.folder_file_limit == 0 {
        return Err(ConfigError::invalid(
            "folder_file_limit",
            settings.folder_file_limit,
            "must be at least 1",
        ));
    }

    if let Some(max_files) = settings.max_files.filter(|count| *count == 0) {
        return Err(ConfigError::invalid(
            "number_of_files",
            max_files,
            "must be at least 1",
        ));
    }

    if let Some(size_mb) = settings.size_mb.filter(|size| *size == 0) {
        return Err(ConfigError::invalid("size", size_mb, "must be at least 1"));
    }
    settings.requested_bytes()?;

    validate_extension(&settings.extension, settings.normalized_extension())?;

    if let Some(pattern) = settings
        .excludes
        .iter()
        .find(|pattern| pattern.trim().is_empty())
    {
        return Err(ConfigError::invalid(
            "exclude",
            pattern,
            "patterns cannot be empty",
        ));
    }

    debug!(
        source = %settings.source_dir.display(),
        destination = %settings.dest_dir.display(),
        extension = settings.normalized_extension(),
        excludes = settings.excludes.len(),
        "settings validated"
    );
    Ok(())
}

fn validate_extension(raw: &str, normalized: &str) -> ConfigResult<()> {
    if normalized.is_empty() {
        return Err(ConfigError::invalid(
            "extension",
            raw,
            "must name a file extension",
        ));
    }
    if normalized.contains(['/', '\\', '.']) {
        return Err(ConfigError::invalid(
            "extension",
            raw,
            "must be a single extension without separators",
        ));
    }
    Ok(())
}
