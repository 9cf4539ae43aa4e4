//! Session and document handles over the engine automation surface.
//!
//! [`Session`] owns one live engine instance for one batch run and is
//! consumed by [`Session::quit`], so a terminated session cannot be reused.
//! [`OpenDocument`] mutably borrows the session, which makes opening a second
//! document while one is held a compile error; the engine is a
//! single-document-at-a-time black box and the types say so.

use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::retry::RetryPolicy;
use crate::status::StatusSink;

use super::error::EngineError;

/// The coarse, synchronous automation surface one engine instance exposes.
/// Every call may fail; the implementation decides the structured failure
/// kind at this boundary.
pub trait Engine: Send {
    /// Toggle the engine's main window visibility.
    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError>;

    /// Best-effort request to minimize the engine and hide its top-level
    /// windows from the desktop. Callers treat failure as non-fatal.
    fn hide_windows(&mut self) -> Result<(), EngineError>;

    /// Open the document at `path`, making it the active document.
    fn open_document(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Send a command string to the active document.
    fn send_command(&mut self, command: &str) -> Result<(), EngineError>;

    /// Enumerate the full paths of all documents the engine reports open.
    fn open_paths(&mut self) -> Result<Vec<PathBuf>, EngineError>;

    /// Close the document at `path` directly through its handle, answering
    /// the save prompt according to `save_changes`.
    fn close_document(&mut self, path: &Path, save_changes: bool) -> Result<(), EngineError>;

    /// Terminate the engine instance.
    fn quit(&mut self) -> Result<(), EngineError>;
}

/// Produces a live [`Engine`] from the configured executable path.
pub trait Connect {
    type Session: Engine;

    /// Fails immediately with [`EngineError::Unreachable`] when the
    /// executable path does not exist on disk; there is no retry on start.
    fn connect(&self, executable: &Path) -> Result<Self::Session, EngineError>;
}

/// Normalized form of a document path used for identity and open-document
/// verification: case-insensitive, separators unified.
pub fn path_key(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "/")
        .to_lowercase()
}

/// One live engine connection, valid for exactly one batch run.
pub struct Session<E: Engine> {
    engine: E,
}

impl<E: Engine> Session<E> {
    /// Start a session: connect, suppress the engine window, hide any
    /// top-level windows it already mapped. The window hiding is best-effort
    /// and its failure is neither fatal nor reported.
    pub fn start<C: Connect<Session = E>>(
        connector: &C,
        executable: &Path,
    ) -> Result<Self, EngineError> {
        let mut engine = connector.connect(executable)?;
        engine.set_visible(false)?;
        let _ = engine.hide_windows();
        Ok(Self { engine })
    }

    /// Open `path` under the given retry policy, returning a handle that
    /// holds the session until the document is released.
    pub async fn open<K: Clock>(
        &mut self,
        path: &Path,
        retry: &RetryPolicy,
        clock: &K,
        events: &StatusSink,
    ) -> Result<OpenDocument<'_, E>, EngineError> {
        let what = format!("open of {}", path.display());
        retry
            .run(clock, events, &what, || self.engine.open_document(path))
            .await?;
        Ok(OpenDocument {
            session: self,
            path: path.to_path_buf(),
        })
    }

    /// Best-effort termination. Consumes the session; a quit session cannot
    /// be reused for another batch run.
    pub fn quit(mut self) -> Result<(), EngineError> {
        self.engine.quit()
    }
}

/// Handle to the single document currently open in the session.
pub struct OpenDocument<'s, E: Engine> {
    session: &'s mut Session<E>,
    path: PathBuf,
}

impl<E: Engine> OpenDocument<'_, E> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send a command to this document under the given retry policy.
    pub async fn send<K: Clock>(
        &mut self,
        command: &str,
        retry: &RetryPolicy,
        clock: &K,
        events: &StatusSink,
    ) -> Result<(), EngineError> {
        retry
            .run(clock, events, "command send", || {
                self.session.engine.send_command(command)
            })
            .await
    }

    /// Whether the engine still enumerates this document among its open
    /// documents, compared case-insensitively. An enumeration failure is
    /// treated as "not open": a session too broken to enumerate cannot be
    /// holding the document either.
    pub fn is_open(&mut self) -> bool {
        let key = path_key(&self.path);
        match self.session.engine.open_paths() {
            Ok(paths) => paths.iter().any(|p| path_key(p) == key),
            Err(_) => false,
        }
    }

    /// Close directly through the document handle, requesting that changes
    /// be saved or discarded.
    pub fn force_close(&mut self, save_changes: bool) -> Result<(), EngineError> {
        self.session.engine.close_document(&self.path, save_changes)
    }
}
