//! `swipedeck log` - list recorded decisions

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::DeckKind;
use crate::storage::DecisionLog;

/// Lists decisions from the log, optionally filtered by deck kind
pub fn run(output: &Output, log_path: &Path, kind: Option<DeckKind>) -> Result<()> {
    let log = DecisionLog::new(log_path);
    output.verbose_ctx("log", &format!("Reading {}", log.path().display()));

    let records: Vec<_> = log
        .read_all()?
        .into_iter()
        .filter(|r| kind.map_or(true, |k| r.kind == k))
        .collect();

    if output.is_json() {
        output.data(&records);
        return Ok(());
    }

    if records.is_empty() {
        println!("No decisions recorded in {}", log.path().display());
        return Ok(());
    }

    println!(
        "{:<20} {:<8} {:<8} {:<6} ITEM",
        "DECIDED AT", "KIND", "VERDICT", "SWIPE"
    );
    println!("{}", "-".repeat(60));
    for record in &records {
        println!(
            "{:<20} {:<8} {:<8} {:<6} {}",
            record.decided_at.format("%Y-%m-%d %H:%M:%S"),
            record.kind,
            record.verdict,
            record.direction,
            record.item_id
        );
    }
    println!();
    println!("{} decision(s)", records.len());

    Ok(())
}
