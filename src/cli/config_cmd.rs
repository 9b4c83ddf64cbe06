//! `swipedeck config` - inspect and create configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::DeckKind;
use crate::storage::{render_deck_section, Config, PROJECT_CONFIG_FILE};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,

    /// Print the config file locations that are searched
    Path,

    /// Write a starter config file
    Init {
        /// Target file (defaults to ./swipedeck.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Write the global config instead of a project file
        #[arg(long, conflicts_with = "path")]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, config),
        ConfigCommands::Path => path(output, config),
        ConfigCommands::Init {
            path,
            global,
            force,
        } => init(output, path, global, force),
    }
}

fn show(output: &Output, config: &Config) -> Result<()> {
    let invites = config.deck(DeckKind::Invites);
    let people = config.deck(DeckKind::People);

    if output.is_json() {
        output.data(&serde_json::json!({
            "source": config.source.describe(),
            "default_kind": config.settings.default_kind,
            "decision_log": config.settings.decision_log,
            "invites": invites,
            "people": people,
            "logging": config.settings.logging,
        }));
        return Ok(());
    }

    println!("# source: {}", config.source.describe());
    println!("default_kind = \"{}\"", config.settings.default_kind);
    if let Some(log) = &config.settings.decision_log {
        println!("decision_log = \"{}\"", log.display());
    }
    println!();
    println!("[invites]");
    print!("{}", render_deck_section(&invites));
    println!();
    println!("[people]");
    print!("{}", render_deck_section(&people));
    println!();
    println!("[logging]");
    println!("filter = \"{}\"", config.settings.logging.filter);
    if let Some(file) = &config.settings.logging.file {
        println!("file = \"{}\"", file.display());
    }

    Ok(())
}

fn path(output: &Output, config: &Config) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let project = Config::find_project_config(&cwd);
    let global = Config::global_config_path();

    if output.is_json() {
        output.data(&serde_json::json!({
            "active": config.source.path(),
            "project": project,
            "global": global,
        }));
        return Ok(());
    }

    println!("active:  {}", config.source.describe());
    println!(
        "project: {}",
        project
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("(no {} found)", PROJECT_CONFIG_FILE))
    );
    println!(
        "global:  {}",
        global
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unavailable)".to_string())
    );
    Ok(())
}

fn init(output: &Output, path: Option<PathBuf>, global: bool, force: bool) -> Result<()> {
    let target = if global {
        Config::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
    } else {
        path.unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE))
    };

    Config::write_template(&target, force)?;
    output.success(&format!("Wrote config to {}", target.display()));
    Ok(())
}
