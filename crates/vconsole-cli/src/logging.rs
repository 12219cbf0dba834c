// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// The TUI owns the terminal, so log lines go to a file. `RUST_LOG` picks the
/// level and defaults to `info`.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("install logger")?;
    log::info!("logging to {}", path.display());
    Ok(())
}

/// Plain stderr logging for the one-shot commands.
pub fn init_stderr_logging() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .try_init()
        .context("install logger")
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log] file to a writable path and retry",
                path.display()
            )
        })
}
