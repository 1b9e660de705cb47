//! Output renderers for the copy command.

use std::io::{self, Write};

use anyhow::anyhow;
use randcopy_fsops::{ProgressSink, StopReason, TransferEvent, TransferReport};

use crate::error::{CliError, CliResult};

/// Renders progress events as human-readable lines.
///
/// Write failures cannot surface through [`ProgressSink::emit`], so the first
/// one is kept and returned by [`TableSink::finish`].
pub(crate) struct TableSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TableSink<W> {
    pub(crate) const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub(crate) fn finish(self) -> CliResult<W> {
        match self.error {
            Some(err) => Err(CliError::failure(
                anyhow::Error::new(err).context("failed to write progress"),
            )),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_fmt(format_args!("{text}\n")) {
            self.error = Some(err);
        }
    }
}

impl<W: Write> ProgressSink for TableSink<W> {
    fn emit(&mut self, event: TransferEvent) {
        match event {
            TransferEvent::Scanning { root } => {
                self.line(format_args!("Scanning {}...", root.display()));
            }
            TransferEvent::Copying { .. } => self.line(format_args!("Copying files...")),
            TransferEvent::FileCopied(file) => {
                self.line(format_args!("    - {}", file.source.display()));
            }
            TransferEvent::Stopped { reason } => match reason {
                StopReason::DestinationFull => self.line(format_args!("Destination full!")),
                StopReason::FileLimitReached => self.line(format_args!("File limit reached!")),
                StopReason::SelectionExhausted => {}
            },
        }
    }
}

pub(crate) fn render_summary(out: &mut impl Write, report: &TransferReport) -> CliResult<()> {
    writeln!(
        out,
        "Done! Copied {} files totalling {} MB",
        report.state.files_copied,
        report.megabytes_copied()
    )
    .map_err(|err| CliError::failure(anyhow!("failed to write summary: {err}")))
}

pub(crate) fn render_report_json(out: &mut impl Write, report: &TransferReport) -> CliResult<()> {
    let text = serde_json::to_string_pretty(report)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}")
        .map_err(|err| CliError::failure(anyhow!("failed to write report: {err}")))
}

/// Print `error: <message>` to stderr, red when stderr is a terminal.
pub(crate) fn print_error(err: &CliError) {
    let label = console::style("error:").red().bold().for_stderr();
    let message = console::style(err.display_message()).red().for_stderr();
    eprintln!("{label} {message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use randcopy_fsops::CopiedFile;
    use std::path::PathBuf;

    fn render(events: Vec<TransferEvent>) -> String {
        let mut sink = TableSink::new(Vec::new());
        for event in events {
            sink.emit(event);
        }
        match sink.finish() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => panic!("{}", err.display_message()),
        }
    }

    #[test]
    fn progress_lines_follow_event_order() {
        let text = render(vec![
            TransferEvent::Scanning {
                root: PathBuf::from("/music"),
            },
            TransferEvent::Copying { candidates: 1 },
            TransferEvent::FileCopied(CopiedFile {
                source: PathBuf::from("/music/a.mp3"),
                destination: PathBuf::from("/stick/0000 - a.mp3"),
                size_bytes: 3,
            }),
            TransferEvent::Stopped {
                reason: StopReason::DestinationFull,
            },
        ]);
        assert_eq!(
            text,
            "Scanning /music...\nCopying files...\n    - /music/a.mp3\nDestination full!\n"
        );
    }

    #[test]
    fn exhausted_selection_prints_no_stop_line() {
        let text = render(vec![TransferEvent::Stopped {
            reason: StopReason::SelectionExhausted,
        }]);
        assert!(text.is_empty());
        let text = render(vec![TransferEvent::Stopped {
            reason: StopReason::FileLimitReached,
        }]);
        assert_eq!(text, "File limit reached!\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_on_finish() {
        let mut sink = TableSink::new(BrokenPipe);
        sink.emit(TransferEvent::Copying { candidates: 0 });
        let Err(err) = sink.finish() else {
            panic!("broken pipe must be reported");
        };
        assert!(err.display_message().starts_with("failed to write progress"));
    }
}
