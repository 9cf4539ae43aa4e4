pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod sequencer;

pub use lifecycle::CloseConfirmation;
pub use model::{DocumentQueue, DocumentRef, ScriptRef, ScriptSet};
pub use orchestrator::{BatchConfig, BatchOrchestrator, BatchSummary, DocumentRecord, RunResult};
