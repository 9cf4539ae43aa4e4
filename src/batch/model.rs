//! Documents and scripts as the batch sees them.
//!
//! A document's identity is its normalized path; duplicates are rejected on
//! registration. Scripts carry an enabled flag and a user-controlled order;
//! the worker takes an enabled-set snapshot once per document, so reordering
//! or disabling between documents applies to every document that follows.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::engine::path_key;

/// One input document, immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    path: PathBuf,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    fn key(&self) -> String {
        path_key(&self.path)
    }
}

/// One automation script with its enabled flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    path: PathBuf,
    enabled: bool,
}

impl ScriptRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn key(&self) -> String {
        path_key(&self.path)
    }
}

/// The ordered pending set of documents. Entries leave it only by explicit
/// removal; the worker reads it as a slice and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct DocumentQueue {
    documents: Vec<DocumentRef>,
}

impl DocumentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a document; rejects duplicates by normalized path.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let doc = DocumentRef::new(path);
        if self.documents.iter().any(|d| d.key() == doc.key()) {
            return false;
        }
        self.documents.push(doc);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<DocumentRef> {
        if index < self.documents.len() {
            Some(self.documents.remove(index))
        } else {
            None
        }
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// The ordered script list, shared between the caller and the batch worker.
///
/// The caller is expected to leave the set alone while a run is active
/// (mutating controls are disabled for the duration); the lock exists so a
/// change that does land between documents is seen consistently.
#[derive(Debug, Clone, Default)]
pub struct ScriptSet {
    inner: Arc<Mutex<Vec<ScriptRef>>>,
}

impl ScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script at the end of the order; rejects duplicates by path.
    pub fn add(&self, path: impl Into<PathBuf>) -> bool {
        let script = ScriptRef::new(path);
        let mut scripts = self.inner.lock().unwrap();
        if scripts.iter().any(|s| s.key() == script.key()) {
            return false;
        }
        scripts.push(script);
        true
    }

    /// Flip the enabled flag of the script at `index`.
    pub fn set_enabled(&self, index: usize, enabled: bool) -> bool {
        let mut scripts = self.inner.lock().unwrap();
        match scripts.get_mut(index) {
            Some(script) => {
                script.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Disable every script whose file name matches `name`, returning how
    /// many were hit.
    pub fn disable_named(&self, name: &str) -> usize {
        let mut scripts = self.inner.lock().unwrap();
        let mut hits = 0;
        for script in scripts.iter_mut() {
            if script.file_name().eq_ignore_ascii_case(name) {
                script.enabled = false;
                hits += 1;
            }
        }
        hits
    }

    /// Move the script at `index` one position earlier in the order.
    pub fn move_up(&self, index: usize) -> bool {
        let mut scripts = self.inner.lock().unwrap();
        if index == 0 || index >= scripts.len() {
            return false;
        }
        scripts.swap(index - 1, index);
        true
    }

    /// Move the script at `index` one position later in the order.
    pub fn move_down(&self, index: usize) -> bool {
        let mut scripts = self.inner.lock().unwrap();
        if index + 1 >= scripts.len() {
            return false;
        }
        scripts.swap(index, index + 1);
        true
    }

    /// Snapshot of the enabled scripts in their current order.
    pub fn enabled(&self) -> Vec<ScriptRef> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect()
    }

    /// Snapshot of all scripts in their current order.
    pub fn snapshot(&self) -> Vec<ScriptRef> {
        self.inner.lock().unwrap().clone()
    }

    pub fn has_enabled(&self) -> bool {
        self.inner.lock().unwrap().iter().any(|s| s.enabled)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
