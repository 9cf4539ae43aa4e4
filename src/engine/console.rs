//! Production engine driver: the engine's console executable as a child
//! process, commands written to its stdin.
//!
//! The console engine gives no structured replies, so open-document
//! verification leans on the lock file the engine keeps beside every open
//! drawing (`<name>.dwl`): a drawing whose lock file is gone has been
//! released, whatever the command stream claimed.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use super::commands;
use super::error::{EngineError, EngineOp};
use super::session::{Connect, Engine, path_key};

/// Connects by launching the configured console executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleConnector;

impl Connect for ConsoleConnector {
    type Session = ConsoleEngine;

    fn connect(&self, executable: &Path) -> Result<ConsoleEngine, EngineError> {
        if !executable.exists() {
            return Err(EngineError::Unreachable(format!(
                "engine executable not found at {}",
                executable.display()
            )));
        }
        ConsoleEngine::launch(executable)
    }
}

/// One engine child process with its command pipe.
pub struct ConsoleEngine {
    child: Child,
    stdin: ChildStdin,
    // Documents this session has opened; enumeration filters them through
    // the engine's lock files.
    tracked: Vec<PathBuf>,
}

impl ConsoleEngine {
    fn launch(executable: &Path) -> Result<Self, EngineError> {
        let mut child = Command::new(executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                EngineError::Unreachable(format!(
                    "failed to launch engine at {}: {err}",
                    executable.display()
                ))
            })?;
        let stdin = child.stdin.take().ok_or_else(|| {
            EngineError::Unreachable("engine process exposes no command pipe".into())
        })?;
        Ok(Self {
            child,
            stdin,
            tracked: Vec::new(),
        })
    }

    fn write(&mut self, text: &str, op: EngineOp) -> Result<(), EngineError> {
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return Err(EngineError::Disconnected);
        }
        self.stdin
            .write_all(text.as_bytes())
            .and_then(|()| self.stdin.flush())
            .map_err(|err| match err.kind() {
                io::ErrorKind::BrokenPipe => EngineError::Disconnected,
                _ => EngineError::operation(op, err.to_string()),
            })
    }

    fn lock_file(path: &Path) -> PathBuf {
        path.with_extension("dwl")
    }
}

impl Engine for ConsoleEngine {
    // The console engine runs headless; there is no window to show.
    fn set_visible(&mut self, _visible: bool) -> Result<(), EngineError> {
        Ok(())
    }

    fn hide_windows(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn open_document(&mut self, path: &Path) -> Result<(), EngineError> {
        self.write(&commands::open_document(path), EngineOp::OpenDocument)?;
        self.tracked.push(path.to_path_buf());
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        self.write(command, EngineOp::SendCommand)
    }

    fn open_paths(&mut self) -> Result<Vec<PathBuf>, EngineError> {
        self.tracked.retain(|p| Self::lock_file(p).exists());
        Ok(self.tracked.clone())
    }

    fn close_document(&mut self, path: &Path, save_changes: bool) -> Result<(), EngineError> {
        self.write(&commands::close_document(save_changes), EngineOp::CloseDocument)?;
        let key = path_key(path);
        self.tracked.retain(|p| path_key(p) != key);
        Ok(())
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        // Ask nicely, then make sure. An already-dead engine is a quit
        // engine, not an error.
        let _ = self.write(&commands::quit(), EngineOp::Quit);
        let _ = self.child.kill();
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for ConsoleEngine {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
