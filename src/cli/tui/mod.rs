//! Interactive swipe deck
//!
//! Renders the visible stack with ratatui and feeds mouse drags and arrow
//! keys into a [`SwipeDeck`]. Mouse cells are converted to pixels so the
//! deck's pixel-based thresholds apply unchanged.

mod app;
mod card;
mod event;
mod ui;
mod utils;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::domain::{Decision, DecisionHandler, SwipeDeck, Verdict};
use app::DeckApp;
use event::EventHandler;

/// Redraw and settle-check interval
const TICK_RATE_MS: u64 = 30;

/// Launch the deck; returns the decisions made before quitting
pub fn run<V: Verdict>(
    output: &Output,
    deck: SwipeDeck<V, Box<dyn DecisionHandler>>,
    title: &str,
) -> Result<Vec<Decision<V>>> {
    output.verbose_ctx("tui", "Initializing terminal deck");

    let mut terminal = ui::init_terminal()?;
    let mut app = DeckApp::new(deck, title);
    let event_handler = EventHandler::new(TICK_RATE_MS);

    // Restore the terminal even if drawing panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result?;
            Ok(app.finish())
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("Deck panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("Deck panicked: {}", s))
            } else {
                Err(anyhow!("Deck panicked with unknown error"))
            }
        }
    }
}
