//! Item files
//!
//! Items come from whatever the data-fetching layer exported. Three
//! layouts are accepted, chosen by extension:
//!
//! | Extension | Layout |
//! |-----------|--------|
//! | `.jsonl` | One JSON object per line |
//! | `.json` | A JSON array of objects |
//! | `.yaml`, `.yml` | A YAML sequence of mappings |
//!
//! Each object may carry an `id`; every other field is payload.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{IdError, Item};

#[derive(Debug, Error)]
pub enum ItemLoadError {
    #[error("Failed to read item file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported item file format: {0} (expected .jsonl, .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Record {record}: {message}")]
    Parse { record: usize, message: String },

    #[error("Record {record} is not an object")]
    NotAnObject { record: usize },

    #[error("Record {record}: {source}")]
    BadId { record: usize, source: IdError },
}

/// Layout of an item file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    JsonLines,
    Json,
    Yaml,
}

impl ItemFormat {
    /// Picks a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jsonl" | "ndjson" => Some(ItemFormat::JsonLines),
            "json" => Some(ItemFormat::Json),
            "yaml" | "yml" => Some(ItemFormat::Yaml),
            _ => None,
        }
    }
}

/// Reads items from a file, preserving order
pub fn load_items(path: &Path) -> Result<Vec<Item>, ItemLoadError> {
    let format = ItemFormat::from_path(path)
        .ok_or_else(|| ItemLoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| ItemLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let items = parse_items(&content, format)?;
    tracing::debug!(path = %path.display(), count = items.len(), "Loaded items");
    Ok(items)
}

/// Parses items from a string in the given format
pub fn parse_items(content: &str, format: ItemFormat) -> Result<Vec<Item>, ItemLoadError> {
    let records: Vec<(usize, serde_json::Value)> = match format {
        ItemFormat::JsonLines => {
            let mut records = Vec::new();
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value = serde_json::from_str(line).map_err(|e| ItemLoadError::Parse {
                    record: line_num + 1,
                    message: e.to_string(),
                })?;
                records.push((line_num + 1, value));
            }
            records
        }
        ItemFormat::Json => {
            let values: Vec<serde_json::Value> =
                serde_json::from_str(content).map_err(|e| ItemLoadError::Parse {
                    record: 0,
                    message: e.to_string(),
                })?;
            values.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect()
        }
        ItemFormat::Yaml => {
            let values: Vec<serde_json::Value> =
                serde_yaml::from_str(content).map_err(|e| ItemLoadError::Parse {
                    record: 0,
                    message: e.to_string(),
                })?;
            values.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect()
        }
    };

    records
        .into_iter()
        .map(|(record, value)| match value {
            serde_json::Value::Object(map) => {
                Item::from_record(map).map_err(|source| ItemLoadError::BadId { record, source })
            }
            _ => Err(ItemLoadError::NotAnObject { record }),
        })
        .collect()
}
