//! Shared test doubles: a scriptable mock engine, a connector handing it
//! out, a clock that records sleeps instead of waiting, and event drains.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::clock::Clock;
use crate::engine::{Connect, Engine, EngineError, EngineOp, path_key};
use crate::status::{BatchEvent, StatusEvent};

/// Everything the mock engine can be told to do, plus everything it records.
#[derive(Default)]
pub struct MockState {
    // Recorded behavior.
    pub visible: Option<bool>,
    pub hide_windows_called: bool,
    pub commands: Vec<String>,
    pub open_calls: u32,
    pub opened: Vec<PathBuf>,
    pub open_now: Vec<PathBuf>,
    pub active: Option<PathBuf>,
    pub force_close_calls: u32,
    pub quit_calls: u32,
    // Scripted failures.
    pub fail_hide_windows: bool,
    pub fail_open: HashMap<String, u32>,
    pub fail_commands_containing: Option<(String, u32)>,
    pub disconnect_on_command_containing: Option<String>,
    pub ignore_close_commands: u32,
    pub always_stuck: bool,
    pub fail_force_close: bool,
    pub fail_enumerate: bool,
    pub fail_quit: bool,
    // Invoked at the top of every open attempt, before failure scripting.
    pub on_open: Option<Box<dyn FnMut(&Path) + Send>>,
}

/// An [`Engine`] whose behavior is scripted through shared [`MockState`].
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Handle for scripting failures and inspecting recorded calls.
    pub fn state(&self) -> Arc<Mutex<MockState>> {
        Arc::clone(&self.state)
    }
}

impl Engine for MockEngine {
    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError> {
        self.state.lock().unwrap().visible = Some(visible);
        Ok(())
    }

    fn hide_windows(&mut self) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        state.hide_windows_called = true;
        if state.fail_hide_windows {
            return Err(EngineError::operation(EngineOp::Start, "window hide rejected"));
        }
        Ok(())
    }

    fn open_document(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        if let Some(hook) = state.on_open.as_mut() {
            hook(path);
        }
        state.open_calls += 1;
        let key = path_key(path);
        if let Some(remaining) = state.fail_open.get_mut(&key) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(EngineError::operation(
                    EngineOp::OpenDocument,
                    format!("engine failed to open {}", path.display()),
                ));
            }
        }
        state.opened.push(path.to_path_buf());
        state.open_now.push(path.to_path_buf());
        state.active = Some(path.to_path_buf());
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        if let Some(trigger) = &state.disconnect_on_command_containing {
            if command.contains(trigger.as_str()) {
                return Err(EngineError::Disconnected);
            }
        }
        if let Some((pattern, remaining)) = &mut state.fail_commands_containing {
            if command.contains(pattern.as_str()) && *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(EngineError::operation(
                    EngineOp::SendCommand,
                    format!("engine rejected command {}", command.trim_end()),
                ));
            }
        }
        state.commands.push(command.to_string());

        // A close command the engine accepts releases the active document,
        // unless this mock is scripted to leave it stuck.
        if command.contains("_.CLOSE") && !state.always_stuck {
            if state.ignore_close_commands > 0 {
                state.ignore_close_commands -= 1;
            } else if let Some(active) = state.active.take() {
                let key = path_key(&active);
                state.open_now.retain(|p| path_key(p) != key);
            }
        }
        Ok(())
    }

    fn open_paths(&mut self) -> Result<Vec<PathBuf>, EngineError> {
        let state = self.state.lock().unwrap();
        if state.fail_enumerate {
            return Err(EngineError::operation(
                EngineOp::EnumerateDocuments,
                "enumeration unavailable",
            ));
        }
        Ok(state.open_now.clone())
    }

    fn close_document(&mut self, path: &Path, _save_changes: bool) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        state.force_close_calls += 1;
        if state.fail_force_close {
            return Err(EngineError::operation(
                EngineOp::CloseDocument,
                "forced close rejected",
            ));
        }
        let key = path_key(path);
        state.open_now.retain(|p| path_key(p) != key);
        state.active = None;
        Ok(())
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        state.quit_calls += 1;
        if state.fail_quit {
            return Err(EngineError::operation(EngineOp::Quit, "engine refused to quit"));
        }
        Ok(())
    }
}

/// Hands out one prepared [`MockEngine`] without touching the filesystem.
pub struct MockConnector {
    engine: Mutex<Option<MockEngine>>,
}

impl MockConnector {
    pub fn new(engine: MockEngine) -> Self {
        Self {
            engine: Mutex::new(Some(engine)),
        }
    }
}

impl Connect for MockConnector {
    type Session = MockEngine;

    fn connect(&self, _executable: &Path) -> Result<MockEngine, EngineError> {
        Ok(self
            .engine
            .lock()
            .unwrap()
            .take()
            .expect("mock engine already connected"))
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl ManualClock {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.slept.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

/// Drain all buffered events. Call after the sink side has been dropped.
pub fn drain_events(rx: &mut UnboundedReceiver<BatchEvent>) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Drain only the status events, dropping progress updates.
pub fn drain_statuses(rx: &mut UnboundedReceiver<BatchEvent>) -> Vec<StatusEvent> {
    drain_events(rx)
        .into_iter()
        .filter_map(|event| match event {
            BatchEvent::Status(status) => Some(status),
            BatchEvent::Progress { .. } => None,
        })
        .collect()
}
