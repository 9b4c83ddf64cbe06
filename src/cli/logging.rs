//! Tracing setup
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` selects `debug` for this
//! crate and the config's `logging.filter` applies. The interactive deck
//! owns the terminal, so its logs go to a file or nowhere.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines are written
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Discard,
}

/// Installs the global subscriber
pub fn init(verbose: bool, default_filter: &str, target: LogTarget<'_>) -> Result<()> {
    let fallback = if verbose {
        "swipedeck=debug"
    } else {
        default_filter
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(std::io::sink), false),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
