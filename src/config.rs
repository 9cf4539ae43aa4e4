//! Persisted configuration, loaded from `drover.toml`.
//!
//! Values absent from the file fall back to defaults. The `DROVER_ENGINE`
//! environment variable takes precedence over the file for the engine path.
//! The file is only ever written on an explicit save.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DroverError;

pub const CONFIG_FILE: &str = "drover.toml";

const ENGINE_ENV: &str = "DROVER_ENGINE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the engine console executable.
    #[serde(default)]
    pub engine_executable: String,

    /// Directory scanned for default scripts.
    #[serde(default = "default_script_dir")]
    pub script_dir: String,
}

fn default_script_dir() -> String {
    "lisp".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_executable: String::new(),
            script_dir: default_script_dir(),
        }
    }
}

impl Config {
    /// Load from `drover.toml` in the current directory, defaults if absent.
    pub fn load() -> Result<Self, DroverError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, DroverError> {
        let mut config = if path.exists() {
            toml::from_str::<Config>(&fs::read_to_string(path)?)?
        } else {
            Self::default()
        };

        // Environment takes precedence over the file for the engine path.
        if let Ok(exe) = std::env::var(ENGINE_ENV)
            && !exe.is_empty()
        {
            config.engine_executable = exe;
        }

        Ok(config)
    }

    /// Persist to `drover.toml` in the current directory.
    pub fn save(&self) -> Result<(), DroverError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    /// Persist to `path`. An engine path that does not point at an existing
    /// file is rejected rather than saved.
    pub fn save_to(&self, path: &Path) -> Result<(), DroverError> {
        if !self.engine_executable.is_empty() && !Path::new(&self.engine_executable).is_file() {
            return Err(DroverError::Config(format!(
                "engine executable not found at {}",
                self.engine_executable
            )));
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn engine_executable_path(&self) -> PathBuf {
        PathBuf::from(&self.engine_executable)
    }

    pub fn script_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.script_dir)
    }
}
