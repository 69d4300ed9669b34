//! File-backed logging.
//!
//! The terminal is owned by the renderer while the game runs, so log
//! output goes to a file instead of stdout or stderr.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use simplelog::{Config, LevelFilter, WriteLogger};

pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), file)
        .context("Failed to initialize logger")?;
    Ok(())
}
