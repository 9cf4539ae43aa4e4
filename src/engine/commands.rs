//! Command-language strings accepted by the engine's active document.
//!
//! Paths are embedded as string literals with backslashes normalized to
//! forward slashes, the only separator the engine's script reader accepts.

use std::path::Path;

/// Entry point every batch script is expected to register. This is an
/// external contract with the script authors; it is not validated here.
pub const INVOKE_ENTRY_POINT: &str = "(c:MyLispFunction)\n";

/// Save the active document in place with the engine's native save command.
pub const SAVE_ACTIVE: &str = "(command \"_.QSAVE\")\n";

/// Close the active document.
pub const CLOSE_ACTIVE: &str = "(command \"_.CLOSE\")\n";

/// Load a script file into the active document.
pub fn load_script(path: &Path) -> String {
    format!("(load \"{}\")\n", script_path(path))
}

/// Open a document by absolute path.
pub fn open_document(path: &Path) -> String {
    format!("(command \"_.OPEN\" \"{}\")\n", script_path(path))
}

/// Close a document, answering the save prompt according to `save_changes`.
pub fn close_document(save_changes: bool) -> String {
    let answer = if save_changes { "_Y" } else { "_N" };
    format!("(command \"_.CLOSE\" \"{answer}\")\n")
}

/// Quit the engine, discarding any remaining prompts.
pub fn quit() -> String {
    "(command \"_.QUIT\" \"_Y\")\n".to_string()
}

fn script_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
