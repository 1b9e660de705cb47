//! Progress events emitted while the pipeline runs.
//!
//! Events are delivered synchronously, in order, to a [`ProgressSink`]. The CLI
//! renders them as progress lines; tests record them.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::{CopiedFile, StopReason};

/// Typed progress events surfaced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    /// The scan of `root` is starting.
    Scanning {
        /// Library root being scanned.
        root: PathBuf,
    },
    /// The copy loop is starting over `candidates` shuffled files.
    Copying {
        /// Number of files in the selection order.
        candidates: usize,
    },
    /// One file was copied (or planned, in a dry run).
    FileCopied(CopiedFile),
    /// The copy loop ended.
    Stopped {
        /// Why the loop ended.
        reason: StopReason,
    },
}

impl TransferEvent {
    /// Machine-friendly discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scanning { .. } => "scanning",
            Self::Copying { .. } => "copying",
            Self::FileCopied(_) => "file_copied",
            Self::Stopped { .. } => "stopped",
        }
    }
}

/// Receiver of [`TransferEvent`] values.
pub trait ProgressSink {
    /// Handle one event.
    fn emit(&mut self, event: TransferEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: TransferEvent) {}
}

impl ProgressSink for Vec<TransferEvent> {
    fn emit(&mut self, event: TransferEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<TransferEvent> = Vec::new();
        sink.emit(TransferEvent::Scanning {
            root: PathBuf::from("/music"),
        });
        sink.emit(TransferEvent::Stopped {
            reason: StopReason::SelectionExhausted,
        });
        let kinds: Vec<_> = sink.iter().map(TransferEvent::kind).collect();
        assert_eq!(kinds, ["scanning", "stopped"]);
    }

    #[test]
    fn events_serialize_with_type_tag() -> anyhow::Result<()> {
        let event = TransferEvent::Copying { candidates: 3 };
        let json = serde_json::to_value(&event)?;
        assert_eq!(json["type"], "copying");
        assert_eq!(json["candidates"], 3);
        Ok(())
    }
}
