pub mod commands;
pub mod console;
pub mod error;
pub mod session;

pub use console::{ConsoleConnector, ConsoleEngine};
pub use error::{EngineError, EngineOp};
pub use session::{Connect, Engine, OpenDocument, Session, path_key};
