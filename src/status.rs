//! Status and progress events flowing from the batch worker to the caller.
//!
//! The worker never touches caller-visible state directly. Everything it has
//! to say goes through a [`StatusSink`] into an mpsc channel; the caller
//! drains the receiver on its own task and renders however it likes.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity of a status event, used for terminal coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// An immutable (message, severity) pair appended to the run's status log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub message: String,
    pub severity: Severity,
}

/// Everything the batch worker reports back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Status(StatusEvent),
    Progress { current: usize, total: usize },
}

/// Sending half of the event channel, held by the batch worker.
#[derive(Debug, Clone)]
pub struct StatusSink {
    tx: UnboundedSender<BatchEvent>,
}

impl StatusSink {
    /// Create a sink together with the receiver the caller drains.
    pub fn channel() -> (Self, UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.status(message, Severity::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.status(message, Severity::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.status(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.status(message, Severity::Error);
    }

    pub fn status(&self, message: impl Into<String>, severity: Severity) {
        self.emit(BatchEvent::Status(StatusEvent {
            message: message.into(),
            severity,
        }));
    }

    pub fn progress(&self, current: usize, total: usize) {
        self.emit(BatchEvent::Progress { current, total });
    }

    // A dropped receiver just means nobody is listening anymore; the batch
    // must still run to completion.
    fn emit(&self, event: BatchEvent) {
        let _ = self.tx.send(event);
    }
}

/// Express a (current, total) progress pair as a 0-100 percentage.
/// An empty batch counts as fully complete.
pub fn percent(current: usize, total: usize) -> u64 {
    if total == 0 {
        return 100;
    }
    (current.min(total) as u64 * 100) / total as u64
}
