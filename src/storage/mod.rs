//! # Storage Layer
//!
//! File formats at the edges of the deck engine.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Items | JSONL, JSON array or YAML sequence | any path given on the command line |
//! | Decisions | JSONL (one JSON per line, append-only) | `--log` or `decision_log` in config |
//! | Config | TOML | `--config`, `swipedeck.toml`, or the platform config dir |
//!
//! ## Concurrency Safety
//!
//! - [`DecisionLog`] takes an exclusive `fs2` lock per append and a shared
//!   lock while reading
//!
//! ## Key Types
//!
//! - [`load_items`] - Read an ordered item list for a deck
//! - [`DecisionLog`] - Append and read decision records
//! - [`LogHandler`] - Decision handler that writes to a [`DecisionLog`]
//! - [`Config`] - Deck tuning and CLI defaults

mod items;
mod decision_log;
mod config;

pub use items::{load_items, parse_items, ItemFormat, ItemLoadError};
pub use decision_log::{DecisionLog, DecisionRecord, LogHandler};
pub use config::{
    render_deck_section, Config, ConfigError, ConfigSource, DeckOverrides, LoggingConfig, Settings,
    PROJECT_CONFIG_FILE,
};
