//! Domain models for swipedeck
//!
//! Contains the swipe engine without any I/O concerns: the queue, the
//! gesture state machine, the decision committer and the deck façade
//! that ties them together.

mod id;
mod item;
mod verdict;
mod tuning;
mod queue;
mod gesture;
mod router;
mod settle;
mod committer;
mod deck;

pub use id::{IdError, ItemId};
pub use item::{Item, ItemPayload, ItemStatus};
pub use verdict::{
    verdict_for, Decision, DeckKind, Direction, InviteVerdict, PersonVerdict, Polarity, Verdict,
};
pub use tuning::{DeckConfig, TuningError};
pub use queue::{QueueError, SwipeQueue};
pub use gesture::{DragResult, Feedback, GestureTracker, InputSource, Vec2};
pub use router::InputRouter;
pub use settle::{SettleScheduler, SettleTimer};
pub use committer::{
    callbacks, CallbackFailure, Callbacks, CommitOutcome, DecisionCommitter, DecisionHandler,
};
pub use deck::{DeckError, DeckEvent, Layer, SwipeDeck};
