//! Drover drives an external CAD automation engine through batches of
//! documents: open, run the configured scripts in order, save, close,
//! verify — with bounded retries around every engine call and a status/
//! progress event stream back to the caller.

pub mod batch;
pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod retry;
pub mod scan;
pub mod status;
pub mod ui;

#[cfg(test)]
mod testutil;

pub use batch::{
    BatchConfig, BatchOrchestrator, BatchSummary, DocumentQueue, DocumentRef, RunResult, ScriptRef,
    ScriptSet,
};
pub use clock::{Clock, TokioClock};
pub use config::Config;
pub use engine::{Connect, ConsoleConnector, Engine, EngineError, Session};
pub use error::DroverError;
pub use retry::RetryPolicy;
pub use status::{BatchEvent, Severity, StatusEvent, StatusSink};
