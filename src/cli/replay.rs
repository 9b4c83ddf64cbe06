//! Headless replay of scripted input
//!
//! A script is a JSONL file of input events on a virtual clock:
//!
//! ```text
//! {"kind": "down", "at_ms": 0, "x": 200, "y": 300}
//! {"kind": "move", "at_ms": 40, "x": 330, "y": 310}
//! {"kind": "up", "at_ms": 60}
//! {"kind": "tick", "at_ms": 400}
//! {"kind": "swipe", "at_ms": 500, "direction": "left"}
//! {"kind": "reset", "at_ms": 900}
//! ```
//!
//! `source` defaults to `pointer`; `down` may name a `target` card.
//! Settle timers fire as the clock passes them, and once more after the
//! last event so every pending advance lands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::handlers::build_handler;
use super::output::Output;
use crate::domain::{
    DeckEvent, DeckKind, Direction, DragResult, InputSource, InviteVerdict, ItemId, PersonVerdict,
    SwipeDeck, Verdict,
};
use crate::storage::{load_items, Config};

fn pointer() -> InputSource {
    InputSource::Pointer
}

/// One scripted input event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down {
        #[serde(default)]
        at_ms: u64,
        #[serde(default = "pointer")]
        source: InputSource,
        x: f32,
        y: f32,
        #[serde(default)]
        target: Option<ItemId>,
    },
    Move {
        #[serde(default)]
        at_ms: u64,
        #[serde(default = "pointer")]
        source: InputSource,
        x: f32,
        y: f32,
    },
    Up {
        #[serde(default)]
        at_ms: u64,
        #[serde(default = "pointer")]
        source: InputSource,
    },
    Cancel {
        #[serde(default)]
        at_ms: u64,
        #[serde(default = "pointer")]
        source: InputSource,
    },
    Swipe {
        #[serde(default)]
        at_ms: u64,
        direction: Direction,
    },
    Tick {
        #[serde(default)]
        at_ms: u64,
    },
    Reset {
        #[serde(default)]
        at_ms: u64,
    },
}

impl ScriptEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            ScriptEvent::Down { at_ms, .. }
            | ScriptEvent::Move { at_ms, .. }
            | ScriptEvent::Up { at_ms, .. }
            | ScriptEvent::Cancel { at_ms, .. }
            | ScriptEvent::Swipe { at_ms, .. }
            | ScriptEvent::Tick { at_ms }
            | ScriptEvent::Reset { at_ms } => *at_ms,
        }
    }
}

/// Latest timestamp a script may use (one day of virtual time)
pub const MAX_SCRIPT_MS: u64 = 24 * 60 * 60 * 1000;

/// Parses a JSONL script; timestamps must not go backwards
pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    let mut last_ms = 0;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event: ScriptEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("Failed to parse script event at line {}", line_num + 1))?;

        if event.at_ms() > MAX_SCRIPT_MS {
            anyhow::bail!(
                "Script time at line {} is out of range ({}ms, max {}ms)",
                line_num + 1,
                event.at_ms(),
                MAX_SCRIPT_MS
            );
        }
        if event.at_ms() < last_ms {
            anyhow::bail!(
                "Script time went backwards at line {} ({}ms after {}ms)",
                line_num + 1,
                event.at_ms(),
                last_ms
            );
        }
        last_ms = event.at_ms();
        events.push(event);
    }

    Ok(events)
}

/// Serializable summary of a replay
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub kind: DeckKind,
    pub events: Vec<ReportedEvent>,
    pub decisions: Vec<ReportedDecision>,
    pub failures: Vec<ReportedFailure>,
    pub visible: Vec<String>,
    pub cursor: usize,
    pub exhausted: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportedDecision {
    pub item_id: String,
    pub verdict: &'static str,
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct ReportedFailure {
    pub item_id: String,
    pub verdict: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReportedEvent {
    pub at_ms: u64,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReportedEvent {
    fn from_deck<V: Verdict>(at_ms: u64, event: DeckEvent<V>) -> Self {
        let (name, item_id, detail) = match event {
            DeckEvent::Committed(decision) => (
                "committed",
                Some(decision.item_id.to_string()),
                Some(decision.verdict.label().to_string()),
            ),
            DeckEvent::Duplicate(id) => ("duplicate", Some(id.to_string()), None),
            DeckEvent::DragCancelled(id) => ("cancelled", Some(id.to_string()), None),
            DeckEvent::Advanced { cursor } => ("advanced", None, Some(format!("cursor={}", cursor))),
            DeckEvent::Exhausted => ("exhausted", None, None),
            DeckEvent::Reset => ("reset", None, None),
        };
        Self {
            at_ms,
            event: name.to_string(),
            item_id,
            detail,
        }
    }

    fn text(&self) -> String {
        let mut line = format!("{:>6}ms  {:<10}", self.at_ms, self.event);
        if let Some(id) = &self.item_id {
            line.push_str(&format!(" {}", id));
        }
        if let Some(detail) = &self.detail {
            line.push_str(&format!(" ({})", detail));
        }
        line.trim_end().to_string()
    }
}

/// Options for the `replay` command
pub struct ReplayArgs<'a> {
    pub items: &'a Path,
    pub script: &'a Path,
    pub kind: Option<DeckKind>,
    pub log: Option<PathBuf>,
    pub simulate_failure: &'a [String],
}

/// Runs the `replay` command
pub fn run(output: &Output, config: &Config, args: ReplayArgs<'_>) -> Result<()> {
    let kind = args.kind.unwrap_or(config.settings.default_kind);
    let content = fs::read_to_string(args.script)
        .with_context(|| format!("Failed to read script: {}", args.script.display()))?;
    let script = parse_script(&content)?;
    output.verbose_ctx("replay", &format!("{} script events, kind={}", script.len(), kind));

    let report = match kind {
        DeckKind::Invites => replay::<InviteVerdict>(config, &args, &script)?,
        DeckKind::People => replay::<PersonVerdict>(config, &args, &script)?,
    };

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }

    for event in &report.events {
        println!("{}", event.text());
    }
    for failure in &report.failures {
        output.warn(&format!(
            "Could not {} {}: {}",
            failure.verdict, failure.item_id, failure.message
        ));
    }
    println!();
    println!(
        "{} decision(s); cursor {}; visible: {}",
        report.decisions.len(),
        report.cursor,
        if report.visible.is_empty() {
            "(none)".to_string()
        } else {
            report.visible.join(", ")
        }
    );
    if report.exhausted {
        println!("All done.");
    }
    Ok(())
}

fn replay<V: Verdict>(
    config: &Config,
    args: &ReplayArgs<'_>,
    script: &[ScriptEvent],
) -> Result<ReplayReport> {
    let items = load_items(args.items)?;
    let handler = build_handler::<V>(args.log.clone(), args.simulate_failure);
    let deck_config = config.deck(V::KIND);
    let settle = deck_config.settle_delay();

    let mut deck = SwipeDeck::<V, _>::new(items, deck_config, handler)
        .with_context(|| format!("Failed to build deck from {}", args.items.display()))?;

    let origin = Instant::now();
    let at = |ms: u64| origin + Duration::from_millis(ms);

    let mut events = Vec::new();
    let mut failures = Vec::new();
    let mut collect = |deck: &mut SwipeDeck<V, _>, at_ms: u64| {
        for event in deck.drain_events() {
            events.push(ReportedEvent::from_deck(at_ms, event));
        }
        for failure in deck.drain_failures() {
            failures.push(ReportedFailure {
                item_id: failure.item_id.to_string(),
                verdict: failure.verdict,
                message: failure.message,
            });
        }
    };

    let mut last_ms = 0;
    for event in script {
        let at_ms = event.at_ms();
        let now = at(at_ms);
        deck.tick(now);
        collect(&mut deck, at_ms);

        match event {
            ScriptEvent::Down {
                source, x, y, target, ..
            } => {
                if !deck.pointer_down(*source, *x, *y, target.as_ref()) {
                    tracing::debug!(at_ms, "Press ignored");
                }
            }
            ScriptEvent::Move { source, x, y, .. } => {
                deck.pointer_move(*source, *x, *y);
            }
            ScriptEvent::Up { source, .. } => {
                if deck.pointer_up(*source, now) == DragResult::Ignored {
                    tracing::debug!(at_ms, "Release ignored");
                }
            }
            ScriptEvent::Cancel { source, .. } => {
                deck.pointer_cancel(*source);
            }
            ScriptEvent::Swipe { direction, .. } => {
                if deck.swipe(*direction, now).is_none() {
                    tracing::debug!(at_ms, "Swipe ignored");
                }
            }
            ScriptEvent::Tick { .. } => {}
            ScriptEvent::Reset { .. } => deck.reset(),
        }
        collect(&mut deck, at_ms);
        last_ms = at_ms;
    }

    // Let every pending exit animation finish
    let settle_ms = u64::try_from(settle.as_millis()).unwrap_or(u64::MAX);
    let drain_ms = last_ms.saturating_add(settle_ms);
    deck.tick(at(drain_ms));
    collect(&mut deck, drain_ms);

    let visible = deck.visible_ids().iter().map(|id| id.to_string()).collect();
    let cursor = deck.queue().cursor();
    let exhausted = deck.is_exhausted();
    let decisions = deck
        .teardown()
        .into_iter()
        .map(|d| ReportedDecision {
            item_id: d.item_id.to_string(),
            verdict: d.verdict.label(),
            direction: d.direction,
        })
        .collect();

    Ok(ReplayReport {
        kind: V::KIND,
        events,
        decisions,
        failures,
        visible,
        cursor,
        exhausted,
    })
}
