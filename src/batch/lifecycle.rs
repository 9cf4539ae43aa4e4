//! Per-document state machine: open, run scripts, save, close, verify.
//!
//! The engine's close is neither reliably synchronous nor idempotent, so
//! closing is best confirmed effort: verify by enumeration, close again,
//! force the handle, and if the document still looks open record a warning
//! and move on. A stuck document must never stall the rest of the batch.

use std::time::Duration;

use crate::clock::Clock;
use crate::engine::{Engine, EngineError, Session, commands};
use crate::retry::RetryPolicy;
use crate::status::StatusSink;

use super::model::{DocumentRef, ScriptRef};
use super::sequencer::{self, COMMAND_RETRY};

/// Document open gets a longer leash than ordinary commands: the engine
/// loads large drawings slowly and fails spuriously while it does.
pub(crate) const OPEN_RETRY: RetryPolicy = RetryPolicy::new(5, Duration::from_secs(4));

const SAVE_SETTLE: Duration = Duration::from_secs(2);
const CLOSE_SETTLE: Duration = Duration::from_secs(3);

/// Terminal close state of a processed document. Both variants are processed
/// documents; `StillOpen` is the warning-only outcome for a document the
/// engine would not confirm closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseConfirmation {
    Confirmed,
    StillOpen,
}

/// Drive one document through open → scripts → save → close → verify.
///
/// Errors out of here mean the document failed (open or command retry
/// exhaustion, disconnect); close trouble is reported as warnings and never
/// fails the document.
pub async fn process_document<E: Engine, K: Clock>(
    session: &mut Session<E>,
    clock: &K,
    events: &StatusSink,
    doc: &DocumentRef,
    scripts: &[ScriptRef],
) -> Result<CloseConfirmation, EngineError> {
    let mut open = session.open(doc.path(), &OPEN_RETRY, clock, events).await?;

    sequencer::run_scripts(&mut open, clock, events, &doc.file_name(), scripts).await?;

    // Save in place with the engine's native save; the pause covers the
    // engine finishing its file I/O.
    open.send(commands::SAVE_ACTIVE, &COMMAND_RETRY, clock, events)
        .await?;
    clock.sleep(SAVE_SETTLE).await;

    open.send(commands::CLOSE_ACTIVE, &COMMAND_RETRY, clock, events)
        .await?;
    clock.sleep(CLOSE_SETTLE).await;

    if open.is_open() {
        events.warning(format!(
            "Document did not close properly on first attempt for {}",
            doc.path().display()
        ));
        open.send(commands::CLOSE_ACTIVE, &COMMAND_RETRY, clock, events)
            .await?;
        clock.sleep(CLOSE_SETTLE).await;
    }

    if open.is_open() {
        if let Err(err) = open.force_close(true) {
            events.warning(format!(
                "Suppressed final close error for {}: {err}",
                doc.path().display()
            ));
        }
        if open.is_open() {
            events.warning(format!(
                "Document still appears open for {}",
                doc.path().display()
            ));
            return Ok(CloseConfirmation::StillOpen);
        }
    }

    Ok(CloseConfirmation::Confirmed)
}
