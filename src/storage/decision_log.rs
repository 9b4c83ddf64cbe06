//! JSONL decision log
//!
//! Stands in for the remote "send decision" call. Each committed decision
//! is appended as one JSON object per line. Uses file locking so a second
//! process (or a `swipedeck log` reader) never sees a torn line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{DeckKind, DecisionHandler, Direction, ItemId, Verdict};

/// One logged decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub item_id: ItemId,
    pub kind: DeckKind,
    pub verdict: String,
    pub direction: Direction,
    pub decided_at: DateTime<Utc>,
}

/// Append-only store of decisions
#[derive(Debug, Clone)]
pub struct DecisionLog {
    path: PathBuf,
}

impl DecisionLog {
    /// Creates a log at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record
    pub fn append(&self, record: &DecisionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open decision log: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on decision log")?;

        let mut line = serde_json::to_string(record).context("Failed to serialize decision")?;
        line.push('\n');

        // Lock is released when file is dropped
        (&file)
            .write_all(line.as_bytes())
            .and_then(|()| file.sync_data())
            .with_context(|| format!("Failed to write decision log: {}", self.path.display()))
    }

    /// Reads every record in order
    pub fn read_all(&self) -> Result<Vec<DecisionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open decision log: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on decision log")?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: DecisionRecord = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse decision at line {}", line_num + 1))?;
            records.push(record);
        }

        Ok(records)
    }

    /// Returns a handler that records decisions for deck kind `V`
    pub fn handler<V: Verdict>(&self) -> LogHandler<V> {
        LogHandler {
            log: self.clone(),
            _verdict: std::marker::PhantomData,
        }
    }
}

/// [`DecisionHandler`] that appends to a [`DecisionLog`]
#[derive(Debug, Clone)]
pub struct LogHandler<V: Verdict> {
    log: DecisionLog,
    _verdict: std::marker::PhantomData<V>,
}

impl<V: Verdict> LogHandler<V> {
    fn record(&self, item_id: &ItemId, direction: Direction) -> Result<()> {
        let verdict: V = crate::domain::verdict_for(direction);
        self.log.append(&DecisionRecord {
            item_id: item_id.clone(),
            kind: V::KIND,
            verdict: verdict.label().to_string(),
            direction,
            decided_at: Utc::now(),
        })
    }

    pub fn log(&self) -> &DecisionLog {
        &self.log
    }
}

impl<V: Verdict> DecisionHandler for LogHandler<V> {
    fn on_affirm(&mut self, item_id: &ItemId) -> Result<()> {
        self.record(item_id, Direction::Right)
    }

    fn on_decline(&mut self, item_id: &ItemId) -> Result<()> {
        self.record(item_id, Direction::Left)
    }
}
