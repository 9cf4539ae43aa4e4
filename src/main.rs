use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use drover::batch::{BatchConfig, BatchOrchestrator, DocumentQueue, ScriptSet};
use drover::cli::{Cli, Command};
use drover::clock::TokioClock;
use drover::config::Config;
use drover::engine::ConsoleConnector;
use drover::status::StatusSink;
use drover::ui::{self, BatchDisplay};
use drover::scan;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            files,
            scripts,
            script_dir,
            disable,
            json,
        } => run(&cli.config, files, scripts, script_dir, disable, json).await,
        Command::Scripts { script_dir } => list_scripts(&cli.config, script_dir),
        Command::Config { engine, detect } => configure(&cli.config, engine, detect),
    }
}

async fn run(
    config_path: &Path,
    files: Vec<PathBuf>,
    extra_scripts: Vec<PathBuf>,
    script_dir: Option<PathBuf>,
    disable: Vec<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    if config.engine_executable.is_empty() {
        bail!("no engine executable configured; run `drover config --engine <path>` first");
    }

    let mut queue = DocumentQueue::new();
    for file in files {
        if !queue.add(&file) {
            eprintln!("skipping duplicate document {}", file.display());
        }
    }

    let scripts = assemble_scripts(&config, script_dir, extra_scripts)?;
    for name in &disable {
        if scripts.disable_named(name) == 0 {
            eprintln!("--disable {name} matched no script");
        }
    }
    if !scripts.has_enabled() {
        bail!(
            "no enabled scripts; add --script files or drop scripts into {}",
            config.script_dir
        );
    }

    let (sink, rx) = StatusSink::channel();
    let orchestrator = BatchOrchestrator::new(ConsoleConnector, TokioClock, sink);
    let batch_config = BatchConfig {
        engine_executable: config.engine_executable_path(),
    };
    let documents = queue.documents().to_vec();

    // The whole batch runs on one worker task; this task only renders events.
    let worker =
        tokio::spawn(async move { orchestrator.run(&batch_config, &documents, &scripts).await });

    let display = BatchDisplay::start();
    ui::drain(rx, &display).await;
    display.finish();

    let summary = worker.await.context("batch worker panicked")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        display.print_summary(&summary);
    }

    if let Some(fatal) = summary.fatal {
        bail!(fatal);
    }
    Ok(())
}

fn assemble_scripts(
    config: &Config,
    script_dir: Option<PathBuf>,
    extra_scripts: Vec<PathBuf>,
) -> Result<ScriptSet> {
    let dir = script_dir.unwrap_or_else(|| config.script_dir_path());
    let scripts = ScriptSet::new();
    for path in scan::scripts_in_default_dir(&dir)
        .with_context(|| format!("failed to scan {}", dir.display()))?
    {
        scripts.add(path);
    }
    for path in extra_scripts {
        if !scripts.add(&path) {
            eprintln!("skipping duplicate script {}", path.display());
        }
    }
    Ok(scripts)
}

fn list_scripts(config_path: &Path, script_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    let scripts = assemble_scripts(&config, script_dir, Vec::new())?;
    let snapshot = scripts.snapshot();
    if snapshot.is_empty() {
        println!("No scripts found.");
        return Ok(());
    }
    for (index, script) in snapshot.iter().enumerate() {
        println!("{:>3}. {}", index + 1, script.path().display());
    }
    Ok(())
}

fn configure(config_path: &Path, engine: Option<PathBuf>, detect: bool) -> Result<()> {
    let mut config = Config::load_from(config_path).context("failed to load configuration")?;

    let mut dirty = false;
    if detect {
        match scan::find_engine_executable() {
            Some(path) => {
                println!("Detected engine at {}", path.display());
                config.engine_executable = path.display().to_string();
                dirty = true;
            }
            None => bail!("no engine installation found in the conventional locations"),
        }
    }
    if let Some(path) = engine {
        config.engine_executable = path.display().to_string();
        dirty = true;
    }

    if dirty {
        config
            .save_to(config_path)
            .context("failed to save configuration")?;
        println!("Configuration saved to {}", config_path.display());
    } else {
        println!(
            "engine_executable = {}",
            if config.engine_executable.is_empty() {
                "(not set)".to_string()
            } else {
                config.engine_executable.clone()
            }
        );
        println!("script_dir = {}", config.script_dir);
    }
    Ok(())
}
