//! swipedeck - a swipe-to-decide card deck engine
//!
//! An ordered stack of items is decided one card at a time: drag the top
//! card past a threshold (or press a button) to commit an affirmative or
//! negative verdict, then the deck advances after a short settle delay.
//!
//! - [`domain`] - the engine: queue, gesture tracker, committer, deck
//! - [`storage`] - item files, the decision log, configuration
//! - [`cli`] - the `swipedeck` binary and its terminal front end

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    callbacks, verdict_for, DeckConfig, DeckEvent, Decision, DecisionHandler, Direction,
    InviteVerdict, Item, ItemId, PersonVerdict, SwipeDeck, SwipeQueue, Verdict,
};
