//! Command line interface, built on clap.
//!
//! `run` processes documents, `scripts` previews the script order, `config`
//! shows or updates the persisted settings.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_FILE;

/// Drover — batch CAD automation orchestrator.
#[derive(Debug, Parser)]
#[command(name = "drover", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file to read (and write on `config` saves).
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the configured scripts to each document, in order.
    Run {
        /// Documents to process, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Additional script files to apply after the discovered ones.
        #[arg(long = "script")]
        scripts: Vec<PathBuf>,

        /// Directory scanned for scripts instead of the configured default.
        #[arg(long)]
        script_dir: Option<PathBuf>,

        /// Disable the scripts with this file name for the run.
        #[arg(long)]
        disable: Vec<String>,

        /// Print the run summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the scripts a run would apply, in order.
    Scripts {
        /// Directory scanned for scripts instead of the configured default.
        #[arg(long)]
        script_dir: Option<PathBuf>,
    },

    /// Show or update the persisted configuration.
    Config {
        /// Engine executable path to save.
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Probe the conventional install locations for the engine.
        #[arg(long)]
        detect: bool,
    },
}
