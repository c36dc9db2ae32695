//! Progress reporting contract for long-running operations.
//!
//! Every pipeline operation emits an ordered stream of [`ProgressEvent`]s
//! into a caller-provided [`ProgressSink`]: zero or more informational
//! events, then exactly one terminal event (`Completed` or `Failed`), never
//! both and never followed by further events. The [`Reporter`] wrapper
//! enforces the terminal-marker invariant at the type level: terminal
//! methods consume the reporter.
//!
//! Transports that speak plain text lines (SSE, terminals) can use
//! [`TextSink`], which renders `Completed` as the literal `[DONE]` sentinel
//! and `Failed` as an `ERROR: `-prefixed line.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use std::sync::mpsc::Sender;

use serde::Serialize;
use tracing::debug;

/// States of a pipeline operation as observed by a progress consumer.
///
/// `Idle` is the pre-start state and is never emitted. `Complete` and
/// `Failed` are surfaced as the terminal [`ProgressEvent`] variants rather
/// than as `Stage` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    Idle,
    Updating,
    InstallingMain,
    CreatingWorktree,
    PropagatingFiles,
    InstallingWorktree,
    Complete,
    Failed,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Complete | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Updating => "updating",
            PipelineStage::InstallingMain => "installing-main",
            PipelineStage::CreatingWorktree => "creating-worktree",
            PipelineStage::PropagatingFiles => "propagating-files",
            PipelineStage::InstallingWorktree => "installing-worktree",
            PipelineStage::Complete => "complete",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// One element of an operation's ordered progress stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// State-machine transition.
    Stage { stage: PipelineStage },
    /// Informational text line.
    Line { text: String },
    /// Terminal marker: the operation finished successfully.
    Completed,
    /// Terminal marker: the operation failed; `message` carries the
    /// underlying diagnostic verbatim.
    Failed { message: String },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Completed | ProgressEvent::Failed { .. })
    }
}

/// Receives progress events in emission order.
///
/// Sinks must not block for long: they run inline with the operation.
pub trait ProgressSink: Send {
    fn emit(&self, event: ProgressEvent);
}

/// Discards all events.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events into an mpsc channel.
///
/// A disconnected receiver is not an error: the caller stopped reading, but
/// the operation runs to completion regardless, so sends are best-effort.
pub struct ChannelSink {
    tx: Sender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            debug!(
                event = "core.progress.receiver_disconnected",
                "Progress receiver dropped, event discarded"
            );
        }
    }
}

/// Renders events as text lines: stage transitions as `==> <stage>`,
/// `Completed` as the `[DONE]` sentinel, `Failed` as `ERROR: <message>`.
pub struct TextSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl TextSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> ProgressSink for TextSink<W> {
    fn emit(&self, event: ProgressEvent) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let result = match event {
            ProgressEvent::Stage { stage } => writeln!(writer, "==> {}", stage),
            ProgressEvent::Line { text } => writeln!(writer, "{}", text),
            ProgressEvent::Completed => writeln!(writer, "[DONE]"),
            ProgressEvent::Failed { message } => writeln!(writer, "ERROR: {}", message),
        };
        if let Err(e) = result {
            debug!(event = "core.progress.write_failed", error = %e);
        }
    }
}

/// Emits a single operation's progress stream into a sink.
///
/// Informational events go through `&mut self`; the terminal events consume
/// the reporter, so nothing can follow them and each stream carries exactly
/// one terminal marker.
pub struct Reporter {
    sink: Box<dyn ProgressSink>,
}

impl Reporter {
    pub fn new(sink: Box<dyn ProgressSink>) -> Self {
        Self { sink }
    }

    /// Convenience constructor for operations nobody is watching.
    pub fn discard() -> Self {
        Self::new(Box::new(NullSink))
    }

    pub fn stage(&mut self, stage: PipelineStage) {
        self.sink.emit(ProgressEvent::Stage { stage });
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.sink.emit(ProgressEvent::Line { text: text.into() });
    }

    pub fn complete(self) {
        self.sink.emit(ProgressEvent::Completed);
    }

    pub fn fail(self, message: impl Into<String>) {
        self.sink.emit(ProgressEvent::Failed {
            message: message.into(),
        });
    }
}
