//! # Command-Line Interface
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `swipe` | Interactive terminal deck (mouse drag, arrow keys) |
//! | `replay` | Drive a deck from a script of timed input events |
//! | `log` | List recorded decisions |
//! | `config` | Show, locate or create configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! `--verbose` (or `-v`) enables debug logging on stderr; `RUST_LOG`
//! overrides both. The interactive deck logs to `--log-file` only.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod config_cmd;
mod handlers;
mod log_cmd;
mod logging;
mod output;
mod replay;
mod tui;

pub use app::{run, Cli, Commands, DEFAULT_DECISION_LOG};
pub use config_cmd::ConfigCommands;
pub use handlers::{build_handler, FailureSimulator};
pub use output::{Output, OutputFormat};
pub use replay::{parse_script, ReplayReport, ScriptEvent};
