//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::config_cmd::{self, ConfigCommands};
use super::handlers::build_handler;
use super::logging::{self, LogTarget};
use super::output::{Output, OutputFormat};
use super::replay::{self, ReplayArgs};
use super::{log_cmd, tui};
use crate::domain::{DeckKind, InviteVerdict, PersonVerdict, SwipeDeck, Verdict};
use crate::storage::{load_items, Config};

/// Decision log used when neither `--log` nor the config names one
pub const DEFAULT_DECISION_LOG: &str = "decisions.jsonl";

#[derive(Parser)]
#[command(name = "swipedeck")]
#[command(author, version, about = "Decide a stack of cards by swiping left or right")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of the discovered one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Swipe through a deck interactively
    Swipe {
        /// Items file (.jsonl, .json or .yaml)
        items: PathBuf,

        /// Deck kind (invites, people)
        #[arg(long, short)]
        kind: Option<DeckKind>,

        /// Decision log to append to
        #[arg(long)]
        log: Option<PathBuf>,

        /// Write diagnostics to this file while the deck is open
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Replay scripted input against a deck without a terminal
    Replay {
        /// Items file (.jsonl, .json or .yaml)
        items: PathBuf,

        /// Script of input events, one JSON object per line
        script: PathBuf,

        /// Deck kind (invites, people)
        #[arg(long, short)]
        kind: Option<DeckKind>,

        /// Decision log to append to (decisions are not recorded otherwise)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Make the decision handler fail for this item ID (repeatable)
        #[arg(long = "simulate-failure", value_name = "ID")]
        simulate_failure: Vec<String>,
    },

    /// List recorded decisions
    Log {
        /// Decision log to read
        #[arg(long)]
        log: Option<PathBuf>,

        /// Only show decisions from this deck kind
        #[arg(long, short)]
        kind: Option<DeckKind>,
    },

    /// Inspect or create configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format);
    let config = Config::load(cli.config.as_deref())?;

    let filter = config.settings.logging.filter.clone();
    let target = match &cli.command {
        Commands::Swipe { log_file, .. } => log_file
            .as_deref()
            .or(config.settings.logging.file.as_deref())
            .map_or(LogTarget::Discard, LogTarget::File),
        _ => LogTarget::Stderr,
    };
    logging::init(cli.verbose, &filter, target)?;
    output.verbose_ctx("config", &format!("Using {}", config.source.describe()));

    match cli.command {
        Commands::Swipe {
            items, kind, log, ..
        } => {
            let kind = kind.unwrap_or(config.settings.default_kind);
            let log = log.unwrap_or_else(|| decision_log_path(&config));
            match kind {
                DeckKind::Invites => swipe::<InviteVerdict>(&output, &config, &items, log)?,
                DeckKind::People => swipe::<PersonVerdict>(&output, &config, &items, log)?,
            }
        }

        Commands::Replay {
            items,
            script,
            kind,
            log,
            simulate_failure,
        } => replay::run(
            &output,
            &config,
            ReplayArgs {
                items: &items,
                script: &script,
                kind,
                log,
                simulate_failure: &simulate_failure,
            },
        )?,

        Commands::Log { log, kind } => {
            let log = log.unwrap_or_else(|| decision_log_path(&config));
            log_cmd::run(&output, &log, kind)?
        }

        Commands::Config(cmd) => config_cmd::run(cmd, &output, &config)?,
    }

    tracing::debug!("Command completed");
    Ok(())
}

fn decision_log_path(config: &Config) -> PathBuf {
    config
        .settings
        .decision_log
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DECISION_LOG))
}

/// Opens the interactive deck and reports what was decided
fn swipe<V: Verdict>(output: &Output, config: &Config, items: &Path, log: PathBuf) -> Result<()> {
    let loaded = load_items(items)?;
    if loaded.is_empty() {
        output.warn(&format!("No items in {}", items.display()));
        return Ok(());
    }

    let handler = build_handler::<V>(Some(log.clone()), &[]);
    let deck = SwipeDeck::<V, _>::new(loaded, config.deck(V::KIND), handler)
        .with_context(|| format!("Failed to build deck from {}", items.display()))?;

    let title = format!("swipedeck · {}", V::KIND);
    let decisions = tui::run(output, deck, &title)?;

    if output.is_json() {
        let summary: Vec<_> = decisions
            .iter()
            .map(|d| {
                serde_json::json!({
                    "item_id": d.item_id,
                    "verdict": d.verdict.label(),
                    "direction": d.direction,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "kind": V::KIND,
            "log": log,
            "decisions": summary,
        }));
    } else {
        output.success(&format!(
            "{} decision(s) recorded in {}",
            decisions.len(),
            log.display()
        ));
    }
    Ok(())
}
