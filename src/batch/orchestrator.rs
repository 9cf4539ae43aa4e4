//! Drives a whole batch: one engine session, every document in order.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::engine::{Connect, EngineError, EngineOp, Session};
use crate::status::StatusSink;

use super::lifecycle::{self, CloseConfirmation};
use super::model::{DocumentRef, ScriptSet};

/// Configuration the orchestrator needs for one run. Passed in explicitly;
/// there is no process-wide settings state.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub engine_executable: PathBuf,
}

/// Per-document outcome. `Success` and `CloseIncomplete` both count as
/// processed; the other variants mark the document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunResult {
    Success,
    CloseIncomplete,
    OpenFailed,
    CommandFailed,
    EngineDisconnected,
}

impl RunResult {
    pub fn counts_as_success(self) -> bool {
        matches!(self, RunResult::Success | RunResult::CloseIncomplete)
    }
}

impl From<CloseConfirmation> for RunResult {
    fn from(close: CloseConfirmation) -> Self {
        match close {
            CloseConfirmation::Confirmed => RunResult::Success,
            CloseConfirmation::StillOpen => RunResult::CloseIncomplete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub path: PathBuf,
    pub result: RunResult,
}

/// Summary record of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: String,
    pub total: usize,
    pub succeeded: usize,
    pub documents: Vec<DocumentRecord>,
    pub fatal: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// Sequential batch runner. Owns the event sink for the run; the caller
/// drains the matching receiver on its own task.
pub struct BatchOrchestrator<C: Connect, K: Clock> {
    connector: C,
    clock: K,
    events: StatusSink,
}

impl<C: Connect, K: Clock> BatchOrchestrator<C, K> {
    pub fn new(connector: C, clock: K, events: StatusSink) -> Self {
        Self {
            connector,
            clock,
            events,
        }
    }

    /// Process every document in order and report a summary. A document
    /// failure never aborts the batch; only a session that cannot be started
    /// at all ends the run early, and even that path emits the final summary
    /// and a 100% progress update.
    pub async fn run(
        &self,
        config: &BatchConfig,
        documents: &[DocumentRef],
        scripts: &ScriptSet,
    ) -> BatchSummary {
        let started_at = Utc::now();
        let total = documents.len();
        let mut records = Vec::with_capacity(total);
        let mut fatal = None;

        self.events.info("Initializing engine...");
        match Session::start(&self.connector, &config.engine_executable) {
            Err(err) => {
                self.events.error(format!("Error initializing engine: {err}"));
                fatal = Some(err.to_string());
            }
            Ok(mut session) => {
                for (index, doc) in documents.iter().enumerate() {
                    self.events.info(format!(
                        "Processing file: {} ({}/{})",
                        doc.file_name(),
                        index + 1,
                        total
                    ));
                    self.events.progress(index + 1, total);

                    // The enabled set is snapshotted once per document, so a
                    // change landing between documents applies from the next
                    // document on.
                    let enabled = scripts.enabled();
                    let result = match lifecycle::process_document(
                        &mut session,
                        &self.clock,
                        &self.events,
                        doc,
                        &enabled,
                    )
                    .await
                    {
                        Ok(close) => {
                            self.events.success(format!(
                                "Process successful for file {}",
                                doc.path().display()
                            ));
                            close.into()
                        }
                        Err(err) => {
                            let (result, message) = classify(&err);
                            self.events.error(format!(
                                "Error processing file {}: {message}",
                                doc.path().display()
                            ));
                            result
                        }
                    };
                    records.push(DocumentRecord {
                        path: doc.path().to_path_buf(),
                        result,
                    });
                }

                if let Err(err) = session.quit() {
                    self.events.warning(format!("Error quitting engine: {err}"));
                }
            }
        }

        let succeeded = records
            .iter()
            .filter(|r| r.result.counts_as_success())
            .count();
        self.events.info(format!(
            "Processing complete: {succeeded} of {total} processed successfully."
        ));
        self.events.progress(total, total);

        let completed_at = Utc::now();
        BatchSummary {
            run_id: Uuid::new_v4().to_string(),
            total,
            succeeded,
            documents: records,
            fatal,
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
        }
    }
}

// The two engine failure shapes users actually recognize get friendlier
// wording; everything else surfaces the boundary error as-is.
fn classify(err: &EngineError) -> (RunResult, String) {
    match err {
        EngineError::Disconnected => (
            RunResult::EngineDisconnected,
            "The engine may have crashed.".to_string(),
        ),
        EngineError::OperationFailed {
            op: EngineOp::OpenDocument | EngineOp::CloseDocument,
            ..
        } => (
            RunResult::OpenFailed,
            "The file could not be opened or closed.".to_string(),
        ),
        other => (RunResult::CommandFailed, other.to_string()),
    }
}
