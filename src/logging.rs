use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `gitsafe=debug`
pub const LOG_ENV: &str = "GITSAFE_LOG";

/// Filter from `GITSAFE_LOG`, defaulting to `info`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send tracing output to `path`
///
/// The terminal belongs to the TUI, so logs never go to stdout or stderr.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
