//! Random copy command.

use std::io::Write;

use randcopy_config::CopySettings;
use randcopy_fsops::{NullSink, RandomCopyService, selection_rng};
use tracing::info;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output::{TableSink, render_report_json, render_summary};

/// Run one copy and render it to `out` in the chosen format.
pub(crate) fn handle_copy<W: Write>(
    service: &RandomCopyService,
    settings: &CopySettings,
    format: OutputFormat,
    mut out: W,
) -> CliResult<()> {
    let mut rng = selection_rng(settings.seed);
    match format {
        OutputFormat::Table => {
            let mut sink = TableSink::new(out);
            let result = service.run(settings, &mut sink, &mut rng);
            let mut out = sink.finish()?;
            let report = result?;
            render_summary(&mut out, &report)?;
            info!(run_id = %report.run_id, "copy command completed");
        }
        OutputFormat::Json => {
            let report = service.run(settings, &mut NullSink, &mut rng)?;
            render_report_json(&mut out, &report)?;
            info!(run_id = %report.run_id, "copy command completed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use randcopy_fsops::FixedSpaceProbe;
    use randcopy_test_support::fixtures::{LibraryTree, MIB, entry_count};

    fn service(available: u64) -> RandomCopyService {
        RandomCopyService::new(Box::new(FixedSpaceProbe::new(available)))
    }

    fn run(settings: &CopySettings, format: OutputFormat, available: u64) -> CliResult<String> {
        let mut out = Vec::new();
        handle_copy(&service(available), settings, format, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn table_output_lists_files_and_summary() -> anyhow::Result<()> {
        let source = LibraryTree::new()?;
        source.add_file("a.mp3", MIB)?;
        source.add_file("b.mp3", 2 * MIB)?;
        source.add_file("c.mp3", 5 * MIB)?;
        let dest = LibraryTree::new()?;
        let mut settings = CopySettings::new(source.path(), dest.path());
        settings.seed = Some(1);
        settings.max_files = Some(1);

        let text = run(&settings, OutputFormat::Table, 64 * MIB)
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], format!("Scanning {}...", source.path().display()));
        assert_eq!(lines[1], "Copying files...");
        assert!(lines[2].starts_with("    - "));
        assert_eq!(lines[3], "File limit reached!");
        assert!(lines[4].starts_with("Done! Copied 1 files totalling "));
        assert_eq!(entry_count(dest.path())?, 1);
        Ok(())
    }

    #[test]
    fn json_output_is_a_single_report() -> anyhow::Result<()> {
        let source = LibraryTree::new()?;
        source.add_file("a.mp3", 3 * MIB)?;
        let dest = LibraryTree::new()?;
        let mut settings = CopySettings::new(source.path(), dest.path());
        settings.dry_run = true;

        let text = run(&settings, OutputFormat::Json, 64 * MIB)
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let report: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(report["state"]["files_copied"], 1);
        assert_eq!(report["state"]["bytes_copied"], 3 * MIB);
        assert_eq!(report["stop_reason"], "selection_exhausted");
        assert_eq!(entry_count(dest.path())?, 0);
        Ok(())
    }

    #[test]
    fn empty_library_fails_after_scanning_line() -> anyhow::Result<()> {
        let source = LibraryTree::new()?;
        let dest = LibraryTree::new()?;
        let settings = CopySettings::new(source.path(), dest.path());

        let mut out = Vec::new();
        let err = handle_copy(&service(MIB), &settings, OutputFormat::Table, &mut out)
            .err()
            .ok_or_else(|| anyhow::anyhow!("empty library must fail"))?;
        assert!(matches!(err, CliError::Failure(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(err.display_message().starts_with("no .mp3 files found under"));
        assert_eq!(
            String::from_utf8_lossy(&out),
            format!("Scanning {}...\n", source.path().display())
        );
        assert_eq!(entry_count(dest.path())?, 0);
        Ok(())
    }
}
