//! Configuration handling for swipedeck
//!
//! Configuration is read from the first of:
//! 1. an explicit `--config` path
//! 2. `swipedeck.toml` in the working directory or any parent
//! 3. `~/.config/swipedeck/config.toml` (platform config dir)
//!
//! Deck sections only override the fields they name; everything else keeps
//! the preset for that deck kind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DeckConfig, DeckKind};

/// File name searched for in the working directory and its parents
pub const PROJECT_CONFIG_FILE: &str = "swipedeck.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Partial deck settings as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_threshold_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rotation_degrees: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_width_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_distance_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_scale_step: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_opacity_step: Option<f32>,
}

impl DeckOverrides {
    /// Applies the overrides on top of a preset
    pub fn apply(&self, base: DeckConfig) -> DeckConfig {
        DeckConfig {
            commit_threshold_px: self.commit_threshold_px.unwrap_or(base.commit_threshold_px),
            max_rotation_degrees: self.max_rotation_degrees.unwrap_or(base.max_rotation_degrees),
            reference_width_px: self.reference_width_px.unwrap_or(base.reference_width_px),
            fade_distance_px: self.fade_distance_px.unwrap_or(base.fade_distance_px),
            min_opacity: self.min_opacity.unwrap_or(base.min_opacity),
            settle_delay_ms: self.settle_delay_ms.unwrap_or(base.settle_delay_ms),
            stack_depth: self.stack_depth.unwrap_or(base.stack_depth),
            stack_scale_step: self.stack_scale_step.unwrap_or(base.stack_scale_step),
            stack_opacity_step: self.stack_opacity_step.unwrap_or(base.stack_opacity_step),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub filter: String,

    /// Log file for the interactive deck (logs are discarded otherwise)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            file: None,
        }
    }
}

/// Contents of a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deck used when `--kind` is not given
    pub default_kind: DeckKind,

    /// Where decisions are recorded when `--log` is not given
    pub decision_log: Option<PathBuf>,

    pub invites: DeckOverrides,

    pub people: DeckOverrides,

    pub logging: LoggingConfig,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    Global(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) | ConfigSource::Global(p) => {
                Some(p)
            }
            ConfigSource::Defaults => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Explicit(p) => format!("explicit ({})", p.display()),
            ConfigSource::Project(p) => format!("project ({})", p.display()),
            ConfigSource::Global(p) => format!("global ({})", p.display()),
            ConfigSource::Defaults => "built-in defaults".to_string(),
        }
    }
}

/// Loaded configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub source: ConfigSource,
}

impl Config {
    /// Built-in defaults, no file involved
    pub fn defaults() -> Self {
        Self {
            settings: Settings::default(),
            source: ConfigSource::Defaults,
        }
    }

    /// Loads configuration, preferring `explicit` when given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let settings = Self::read_file(path)?;
            return Self::validated(settings, ConfigSource::Explicit(path.to_path_buf()));
        }

        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        if let Some(path) = Self::find_project_config(&cwd) {
            let settings = Self::read_file(&path)?;
            return Self::validated(settings, ConfigSource::Project(path));
        }

        if let Some(path) = Self::global_config_path().filter(|p| p.exists()) {
            let settings = Self::read_file(&path)?;
            return Self::validated(settings, ConfigSource::Global(path));
        }

        Ok(Self::defaults())
    }

    /// Returns the global config file location
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "swipedeck", "swipedeck")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Finds `swipedeck.toml` in `start` or the nearest parent
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Parses settings from TOML text
    pub fn parse(content: &str) -> Result<Settings, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn read_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn validated(settings: Settings, source: ConfigSource) -> Result<Self> {
        let config = Self { settings, source };
        for kind in [DeckKind::Invites, DeckKind::People] {
            config
                .deck(kind)
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("[{}] {}", kind, e)))
                .with_context(|| format!("Invalid config: {}", config.source.describe()))?;
        }
        tracing::debug!(source = %config.source.describe(), "Configuration loaded");
        Ok(config)
    }

    /// Effective deck parameters for a kind
    pub fn deck(&self, kind: DeckKind) -> DeckConfig {
        let overrides = match kind {
            DeckKind::Invites => &self.settings.invites,
            DeckKind::People => &self.settings.people,
        };
        overrides.apply(DeckConfig::for_kind(kind))
    }

    /// Writes a starter config file; refuses to overwrite unless `force`
    pub fn write_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(path, Self::template())
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Starter config listing every option at its default
    pub fn template() -> String {
        let invites = DeckConfig::invites();
        let people = DeckConfig::people();
        format!(
            r#"# swipedeck configuration

default_kind = "invites"
# decision_log = "decisions.jsonl"

[invites]
{invites}
[people]
{people}
[logging]
filter = "warn"
# file = "swipedeck.log"
"#,
            invites = render_deck_section(&invites),
            people = render_deck_section(&people),
        )
    }
}

/// Renders deck parameters as TOML key/value lines
pub fn render_deck_section(config: &DeckConfig) -> String {
    format!(
        "commit_threshold_px = {:?}\n\
         max_rotation_degrees = {:?}\n\
         reference_width_px = {:?}\n\
         fade_distance_px = {:?}\n\
         min_opacity = {:?}\n\
         settle_delay_ms = {}\n\
         stack_depth = {}\n\
         stack_scale_step = {:?}\n\
         stack_opacity_step = {:?}\n",
        config.commit_threshold_px,
        config.max_rotation_degrees,
        config.reference_width_px,
        config.fade_distance_px,
        config.min_opacity,
        config.settle_delay_ms,
        config.stack_depth,
        config.stack_scale_step,
        config.stack_opacity_step,
    )
}
