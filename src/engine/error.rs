//! Structured engine failure kinds.
//!
//! The original automation surface signals errors as free-form text; the kind
//! is decided here, at the boundary where the raw signal is received, so the
//! orchestrator never pattern-matches on message substrings.

use std::fmt;

use thiserror::Error;

/// Which engine operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOp {
    Start,
    OpenDocument,
    SendCommand,
    CloseDocument,
    EnumerateDocuments,
    Quit,
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineOp::Start => "engine start",
            EngineOp::OpenDocument => "document open",
            EngineOp::SendCommand => "command send",
            EngineOp::CloseDocument => "document close",
            EngineOp::EnumerateDocuments => "document enumeration",
            EngineOp::Quit => "engine quit",
        };
        f.write_str(name)
    }
}

/// Errors signaled by the engine boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine cannot be reached at all (missing executable, failed launch).
    #[error("{0}")]
    Unreachable(String),

    /// The live session went away mid-run (engine crash, closed pipe).
    #[error("engine disconnected")]
    Disconnected,

    /// A single operation failed on an otherwise live session.
    #[error("{op} failed: {detail}")]
    OperationFailed { op: EngineOp, detail: String },
}

impl EngineError {
    pub fn operation(op: EngineOp, detail: impl Into<String>) -> Self {
        EngineError::OperationFailed {
            op,
            detail: detail.into(),
        }
    }
}
