//! Decision commit
//!
//! Turns a committed swipe into exactly one handler call per item, marks
//! the item processed and schedules the queue advance.
//!
//! The processed mark is taken before the handler runs. A duplicate or
//! stale commit for the same ID therefore sees `AlreadyProcessed` and
//! returns without calling the handler or scheduling a second advance.
//! Only the top-of-stack item can be decided: each commit schedules one
//! advance, so deciding a card further down would move the cursor past an
//! undecided one.
//! Handler errors never reach the queue: they are logged and returned as
//! a [`CallbackFailure`] for the host to surface (toast, status line).

use std::marker::PhantomData;
use std::time::Instant;

use super::id::ItemId;
use super::queue::{QueueError, SwipeQueue};
use super::settle::{SettleScheduler, SettleTimer};
use super::tuning::DeckConfig;
use super::verdict::{Decision, Direction, Polarity, Verdict};

/// External receiver of decisions (e.g., "send accept to backend")
pub trait DecisionHandler {
    /// Called once for a right swipe
    fn on_affirm(&mut self, item_id: &ItemId) -> anyhow::Result<()>;

    /// Called once for a left swipe
    fn on_decline(&mut self, item_id: &ItemId) -> anyhow::Result<()>;
}

impl<H: DecisionHandler + ?Sized> DecisionHandler for &mut H {
    fn on_affirm(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (**self).on_affirm(item_id)
    }

    fn on_decline(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (**self).on_decline(item_id)
    }
}

impl<H: DecisionHandler + ?Sized> DecisionHandler for Box<H> {
    fn on_affirm(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (**self).on_affirm(item_id)
    }

    fn on_decline(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (**self).on_decline(item_id)
    }
}

/// Handler built from a pair of closures
pub struct Callbacks<A, D> {
    affirm: A,
    decline: D,
}

/// Wraps two closures as a [`DecisionHandler`]
pub fn callbacks<A, D>(affirm: A, decline: D) -> Callbacks<A, D>
where
    A: FnMut(&ItemId) -> anyhow::Result<()>,
    D: FnMut(&ItemId) -> anyhow::Result<()>,
{
    Callbacks { affirm, decline }
}

impl<A, D> DecisionHandler for Callbacks<A, D>
where
    A: FnMut(&ItemId) -> anyhow::Result<()>,
    D: FnMut(&ItemId) -> anyhow::Result<()>,
{
    fn on_affirm(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (self.affirm)(item_id)
    }

    fn on_decline(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
        (self.decline)(item_id)
    }
}

/// A handler error, detached from queue progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    pub item_id: ItemId,
    pub verdict: &'static str,
    pub message: String,
}

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome<V: Verdict> {
    /// First decision for this item; an advance is scheduled
    Committed {
        decision: Decision<V>,
        failure: Option<CallbackFailure>,
    },
    /// The item already had a decision; nothing happened
    Duplicate(ItemId),
    /// The item is undecided but not on top of the stack; nothing happened
    NotTop(ItemId),
    /// The item is not part of the queue
    Unknown(ItemId),
}

/// Commits decisions and drives the settle-delayed advance
#[derive(Debug)]
pub struct DecisionCommitter<V: Verdict> {
    scheduler: SettleScheduler,
    _verdict: PhantomData<V>,
}

impl<V: Verdict> DecisionCommitter<V> {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            scheduler: SettleScheduler::new(config.settle_delay()),
            _verdict: PhantomData,
        }
    }

    /// Commits a decision for `item_id`
    pub fn commit<H: DecisionHandler + ?Sized>(
        &mut self,
        item_id: &ItemId,
        direction: Direction,
        queue: &mut SwipeQueue,
        handler: &mut H,
        now: Instant,
    ) -> CommitOutcome<V> {
        if queue.contains(item_id) && !queue.is_processed(item_id) && !queue.is_top(item_id) {
            tracing::debug!(item = %item_id, "Ignoring commit below the top card");
            return CommitOutcome::NotTop(item_id.clone());
        }

        match queue.mark_processed(item_id) {
            Ok(()) => {}
            Err(QueueError::AlreadyProcessed(id)) => {
                tracing::debug!(item = %id, "Ignoring duplicate commit");
                return CommitOutcome::Duplicate(id);
            }
            Err(e) => {
                tracing::warn!(item = %item_id, error = %e, "Commit for unknown item");
                return CommitOutcome::Unknown(item_id.clone());
            }
        }

        let decision = Decision::<V>::new(item_id.clone(), direction);
        let label = decision.verdict.label();
        tracing::debug!(item = %item_id, verdict = label, %direction, "Committing decision");

        let result = match decision.verdict.polarity() {
            Polarity::Affirmative => handler.on_affirm(item_id),
            Polarity::Negative => handler.on_decline(item_id),
        };

        let failure = result.err().map(|e| {
            let message = format!("{:#}", e);
            tracing::warn!(item = %item_id, verdict = label, error = %message, "Decision handler failed");
            CallbackFailure {
                item_id: item_id.clone(),
                verdict: label,
                message,
            }
        });

        self.scheduler.schedule(item_id.clone(), now);

        CommitOutcome::Committed { decision, failure }
    }

    /// Fires due settle timers, advancing the queue once per timer
    pub fn settle(&mut self, queue: &mut SwipeQueue, now: Instant) -> Vec<SettleTimer> {
        let due = self.scheduler.pop_due(now);
        for timer in &due {
            queue.advance();
            tracing::trace!(item = %timer.item_id, cursor = queue.cursor(), "Settled");
        }
        due
    }

    /// Cancels every pending advance
    pub fn cancel_pending(&mut self) -> usize {
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 {
            tracing::debug!(dropped, "Cancelled pending settle timers");
        }
        dropped
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn pending(&self) -> usize {
        self.scheduler.pending()
    }
}
