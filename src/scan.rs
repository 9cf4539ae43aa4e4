//! Filesystem discovery: script files and the engine installation.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::DroverError;

const SCRIPT_EXTENSION: &str = "lsp";

/// Conventional install roots probed for the engine console executable.
const ENGINE_PROBE_ROOTS: &[&str] = &[
    r"C:\Program Files\Autodesk",
    r"C:\Program Files (x86)\Autodesk",
];

const ENGINE_EXECUTABLE: &str = "acad.exe";

/// Recursively collect script files under `dir`, extension matched
/// case-insensitively, in a stable sorted order.
pub fn find_scripts(dir: &Path) -> Result<Vec<PathBuf>, DroverError> {
    let mut scripts = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_script(entry.path()) {
            scripts.push(entry.path().to_path_buf());
        }
    }
    Ok(scripts)
}

/// Collect scripts from the default directory, creating it when missing so
/// users have somewhere to drop their scripts.
pub fn scripts_in_default_dir(dir: &Path) -> Result<Vec<PathBuf>, DroverError> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
        return Ok(Vec::new());
    }
    find_scripts(dir)
}

/// Probe the conventional install roots for the engine executable.
pub fn find_engine_executable() -> Option<PathBuf> {
    find_engine_in(ENGINE_PROBE_ROOTS.iter().map(Path::new))
}

/// Probe the given roots for the engine executable, first hit wins.
pub fn find_engine_in<'a>(roots: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            if entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .eq_ignore_ascii_case(ENGINE_EXECUTABLE)
            {
                return Some(entry.path().to_path_buf());
            }
        }
    }
    None
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SCRIPT_EXTENSION))
        .unwrap_or(false)
}
