//! Directions, verdicts and decisions
//!
//! A swipe right is always the affirmative verdict and a swipe left the
//! negative one, in every deck kind. The mapping lives in [`verdict_for`]
//! rather than on the trait so no verdict type can flip it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::ItemId;

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction of a horizontal offset; `None` for zero
    pub fn from_offset(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Direction::Right)
        } else if dx < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Semantic polarity of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Affirmative,
    Negative,
}

/// A binary decision vocabulary for one deck kind
pub trait Verdict: Copy + Eq + fmt::Debug + Send + 'static {
    /// The verdict committed on a right swipe
    const AFFIRMATIVE: Self;
    /// The verdict committed on a left swipe
    const NEGATIVE: Self;
    /// Which deck this vocabulary belongs to
    const KIND: DeckKind;

    /// Display label (e.g., "accept")
    fn label(&self) -> &'static str;

    fn polarity(&self) -> Polarity {
        if *self == Self::AFFIRMATIVE {
            Polarity::Affirmative
        } else {
            Polarity::Negative
        }
    }
}

/// Maps a swipe direction to the deck's verdict
pub fn verdict_for<V: Verdict>(direction: Direction) -> V {
    match direction {
        Direction::Right => V::AFFIRMATIVE,
        Direction::Left => V::NEGATIVE,
    }
}

/// Verdicts for reviewing received invites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteVerdict {
    Accept,
    Reject,
}

impl Verdict for InviteVerdict {
    const AFFIRMATIVE: Self = InviteVerdict::Accept;
    const NEGATIVE: Self = InviteVerdict::Reject;
    const KIND: DeckKind = DeckKind::Invites;

    fn label(&self) -> &'static str {
        match self {
            InviteVerdict::Accept => "accept",
            InviteVerdict::Reject => "reject",
        }
    }
}

/// Verdicts for discovering people to invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonVerdict {
    Invite,
    Pass,
}

impl Verdict for PersonVerdict {
    const AFFIRMATIVE: Self = PersonVerdict::Invite;
    const NEGATIVE: Self = PersonVerdict::Pass;
    const KIND: DeckKind = DeckKind::People;

    fn label(&self) -> &'static str {
        match self {
            PersonVerdict::Invite => "invite",
            PersonVerdict::Pass => "pass",
        }
    }
}

/// Which deck instantiation is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    #[default]
    Invites,
    People,
}

impl DeckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeckKind::Invites => "invites",
            DeckKind::People => "people",
        }
    }

    /// Labels for the (negative, affirmative) verdicts
    pub fn verdict_labels(&self) -> (&'static str, &'static str) {
        match self {
            DeckKind::Invites => (
                InviteVerdict::NEGATIVE.label(),
                InviteVerdict::AFFIRMATIVE.label(),
            ),
            DeckKind::People => (
                PersonVerdict::NEGATIVE.label(),
                PersonVerdict::AFFIRMATIVE.label(),
            ),
        }
    }
}

impl fmt::Display for DeckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DeckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invites" | "invite" | "i" => Ok(DeckKind::Invites),
            "people" | "person" | "p" => Ok(DeckKind::People),
            other => Err(format!("unknown deck kind '{}'", other)),
        }
    }
}

/// A committed decision for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision<V: Verdict> {
    pub item_id: ItemId,
    pub verdict: V,
    pub direction: Direction,
}

impl<V: Verdict> Decision<V> {
    pub fn new(item_id: ItemId, direction: Direction) -> Self {
        Self {
            item_id,
            verdict: verdict_for(direction),
            direction,
        }
    }
}
