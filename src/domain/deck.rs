//! Swipe deck
//!
//! The façade a presentation layer drives. It binds the gesture tracker to
//! the current top card, routes input through a single-owner router,
//! commits decisions and advances the queue on settle ticks.
//!
//! Time is injected through `now` on every call that can schedule or fire
//! a settle timer. Timers are owned by the deck, so dropping it (or
//! calling [`SwipeDeck::teardown`]) guarantees no stale advance runs.

use std::time::Instant;

use thiserror::Error;

use super::committer::{CallbackFailure, CommitOutcome, DecisionCommitter, DecisionHandler};
use super::gesture::{DragResult, Feedback, GestureTracker, InputSource};
use super::id::ItemId;
use super::item::Item;
use super::queue::{QueueError, SwipeQueue};
use super::router::InputRouter;
use super::tuning::{DeckConfig, TuningError};
use super::verdict::{Decision, Direction, Verdict};

#[derive(Debug, Error, PartialEq)]
pub enum DeckError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Invalid deck configuration: {0}")]
    Tuning(#[from] TuningError),
}

/// Lifecycle notifications for the host
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent<V: Verdict> {
    Committed(Decision<V>),
    Duplicate(ItemId),
    DragCancelled(ItemId),
    Advanced { cursor: usize },
    Exhausted,
    Reset,
}

/// One card of the visible stack
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<'a> {
    pub item: &'a Item,
    /// 0 for the top card
    pub depth: usize,
    pub scale: f32,
    pub opacity: f32,
    /// Live gesture feedback (rest pose unless this card is being dragged)
    pub feedback: Feedback,
}

impl Layer<'_> {
    pub fn is_top(&self) -> bool {
        self.depth == 0
    }
}

pub struct SwipeDeck<V: Verdict, H: DecisionHandler> {
    config: DeckConfig,
    queue: SwipeQueue,
    tracker: GestureTracker,
    router: InputRouter,
    committer: DecisionCommitter<V>,
    handler: H,

    /// Item the active drag started on
    bound: Option<ItemId>,

    events: Vec<DeckEvent<V>>,
    failures: Vec<CallbackFailure>,

    /// Decisions since construction or the last reset
    history: Vec<Decision<V>>,

    exhausted_reported: bool,
}

impl<V: Verdict, H: DecisionHandler> SwipeDeck<V, H> {
    /// Builds a deck; fails on duplicate IDs or unusable configuration
    pub fn new(items: Vec<Item>, config: DeckConfig, handler: H) -> Result<Self, DeckError> {
        config.validate()?;
        let queue = SwipeQueue::initialize(items)?;

        tracing::debug!(
            kind = %V::KIND,
            items = queue.len(),
            depth = config.stack_depth,
            "Deck initialized"
        );

        Ok(Self {
            tracker: GestureTracker::new(&config),
            router: InputRouter::new(),
            committer: DecisionCommitter::new(&config),
            config,
            queue,
            handler,
            bound: None,
            events: Vec::new(),
            failures: Vec::new(),
            history: Vec::new(),
            exhausted_reported: false,
        })
    }

    /// Presses down on a card; `target` defaults to the top card
    ///
    /// Returns true if a drag started.
    pub fn pointer_down(
        &mut self,
        source: InputSource,
        x: f32,
        y: f32,
        target: Option<&ItemId>,
    ) -> bool {
        let Some(top) = self.queue.top().map(|item| item.id.clone()) else {
            return false;
        };
        let is_top = target.map_or(true, |id| *id == top);
        if !is_top || !self.router.capture(source) {
            return false;
        }

        if self.tracker.begin_drag(source, x, y, true) {
            tracing::trace!(item = %top, source = source.label(), "Drag started");
            self.bound = Some(top);
            true
        } else {
            if !self.tracker.is_dragging() {
                self.router.release(source);
            }
            false
        }
    }

    /// Moves the active drag; `None` if `source` does not own it
    pub fn pointer_move(&mut self, source: InputSource, x: f32, y: f32) -> Option<Feedback> {
        if !self.router.accepts(source) {
            return None;
        }
        self.tracker.update_drag(source, x, y)
    }

    /// Releases the active drag, committing the bound card if the threshold was met
    pub fn pointer_up(&mut self, source: InputSource, now: Instant) -> DragResult {
        if !self.router.release(source) {
            return DragResult::Ignored;
        }

        let result = self.tracker.end_drag(source);
        let bound = self.bound.take();

        match (result, bound) {
            (DragResult::Committed(direction), Some(item_id)) => {
                self.commit(&item_id, direction, now);
            }
            (DragResult::Cancelled, Some(item_id)) => {
                self.events.push(DeckEvent::DragCancelled(item_id));
            }
            _ => {}
        }
        result
    }

    /// Abandons the active drag without deciding
    pub fn pointer_cancel(&mut self, source: InputSource) -> bool {
        if !self.router.release(source) {
            return false;
        }
        self.tracker.cancel();
        if let Some(item_id) = self.bound.take() {
            self.events.push(DeckEvent::DragCancelled(item_id));
        }
        true
    }

    /// Decides the top card without a gesture (buttons, arrow keys)
    ///
    /// Ignored while a drag is in progress.
    pub fn swipe(&mut self, direction: Direction, now: Instant) -> Option<CommitOutcome<V>> {
        if self.tracker.is_dragging() {
            return None;
        }
        let top = self.queue.top()?.id.clone();
        Some(self.commit(&top, direction, now))
    }

    /// Commits a decision for the top item
    ///
    /// Stale or repeated IDs are tolerated as [`CommitOutcome::Duplicate`];
    /// an undecided card below the top is refused with [`CommitOutcome::NotTop`].
    pub fn commit(&mut self, item_id: &ItemId, direction: Direction, now: Instant) -> CommitOutcome<V> {
        let outcome =
            self.committer
                .commit(item_id, direction, &mut self.queue, &mut self.handler, now);

        match &outcome {
            CommitOutcome::Committed {
                decision, failure, ..
            } => {
                self.history.push(decision.clone());
                self.events.push(DeckEvent::Committed(decision.clone()));
                if let Some(failure) = failure {
                    self.failures.push(failure.clone());
                }
            }
            CommitOutcome::Duplicate(id) => {
                self.events.push(DeckEvent::Duplicate(id.clone()));
            }
            CommitOutcome::NotTop(_) | CommitOutcome::Unknown(_) => {}
        }
        outcome
    }

    /// Fires due settle timers; returns how many advances ran
    pub fn tick(&mut self, now: Instant) -> usize {
        let fired = self.committer.settle(&mut self.queue, now);
        for _ in &fired {
            self.events.push(DeckEvent::Advanced {
                cursor: self.queue.cursor(),
            });
        }

        if !self.exhausted_reported && self.committer.pending() == 0 && self.queue.is_exhausted() {
            self.exhausted_reported = true;
            self.events.push(DeckEvent::Exhausted);
        }
        fired.len()
    }

    /// Rewinds the deck so the same items can be decided again
    pub fn reset(&mut self) {
        let dropped = self.committer.cancel_pending();
        self.tracker.cancel();
        self.router.clear();
        self.bound = None;
        self.queue.reset();
        self.history.clear();
        self.exhausted_reported = false;
        self.events.push(DeckEvent::Reset);
        tracing::debug!(dropped, "Deck reset");
    }

    /// Stops the deck, dropping pending advances, and returns its decisions
    pub fn teardown(mut self) -> Vec<Decision<V>> {
        let dropped = self.committer.cancel_pending();
        self.tracker.cancel();
        self.router.clear();
        tracing::debug!(dropped, decisions = self.history.len(), "Deck torn down");
        self.history
    }

    /// Visible cards, top first
    pub fn layers(&self) -> Vec<Layer<'_>> {
        let scale_step = self.config.stack_scale_step;
        let opacity_step = self.config.stack_opacity_step;

        self.queue
            .visible_stack(self.config.stack_depth)
            .into_iter()
            .enumerate()
            .map(|(depth, item)| {
                let step = depth as f32;
                let dragging = depth == 0 && self.bound.as_ref() == Some(&item.id);
                Layer {
                    item,
                    depth,
                    scale: (1.0 - step * scale_step).clamp(0.0, 1.0),
                    opacity: (1.0 - step * opacity_step).clamp(0.0, 1.0),
                    feedback: if dragging {
                        self.tracker.feedback()
                    } else {
                        Feedback::REST
                    },
                }
            })
            .collect()
    }

    /// IDs of the visible cards, top first
    pub fn visible_ids(&self) -> Vec<&ItemId> {
        self.queue
            .visible_stack(self.config.stack_depth)
            .into_iter()
            .map(|item| &item.id)
            .collect()
    }

    pub fn top(&self) -> Option<&Item> {
        self.queue.top()
    }

    pub fn drain_events(&mut self) -> Vec<DeckEvent<V>> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_failures(&mut self) -> Vec<CallbackFailure> {
        std::mem::take(&mut self.failures)
    }

    pub fn decisions(&self) -> &[Decision<V>] {
        &self.history
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_exhausted()
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    /// True while an exit animation is still waiting to settle
    pub fn is_settling(&self) -> bool {
        self.committer.pending() > 0
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.committer.next_deadline()
    }

    pub fn queue(&self) -> &SwipeQueue {
        &self.queue
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::{InviteVerdict, PersonVerdict};
    use std::time::Duration;

    const P: InputSource = InputSource::Pointer;
    const T: InputSource = InputSource::Touch;

    #[derive(Default)]
    struct Recorder {
        affirmed: Vec<String>,
        declined: Vec<String>,
        fail: bool,
    }

    impl DecisionHandler for Recorder {
        fn on_affirm(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
            self.affirmed.push(item_id.to_string());
            if self.fail {
                anyhow::bail!("503 from backend");
            }
            Ok(())
        }

        fn on_decline(&mut self, item_id: &ItemId) -> anyhow::Result<()> {
            self.declined.push(item_id.to_string());
            Ok(())
        }
    }

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(id.parse().unwrap())).collect()
    }

    fn deck(ids: &[&str]) -> SwipeDeck<InviteVerdict, Recorder> {
        SwipeDeck::new(items(ids), DeckConfig::invites(), Recorder::default()).unwrap()
    }

    fn visible(deck: &SwipeDeck<InviteVerdict, Recorder>) -> Vec<String> {
        deck.visible_ids().iter().map(|id| id.to_string()).collect()
    }

    fn drag(deck: &mut SwipeDeck<InviteVerdict, Recorder>, dx: f32, now: Instant) -> DragResult {
        assert!(deck.pointer_down(P, 200.0, 300.0, None));
        deck.pointer_move(P, 200.0 + dx / 2.0, 305.0);
        deck.pointer_move(P, 200.0 + dx, 310.0);
        deck.pointer_up(P, now)
    }

    const SETTLE: Duration = Duration::from_millis(300);

    #[test]
    fn five_card_walkthrough() {
        let mut deck = deck(&["A", "B", "C", "D", "E"]);
        let t0 = Instant::now();
        assert_eq!(visible(&deck), ["A", "B", "C"]);

        assert_eq!(drag(&mut deck, 120.0, t0), DragResult::Committed(Direction::Right));
        assert_eq!(deck.handler().affirmed, ["A"]);
        deck.tick(t0 + SETTLE);
        assert_eq!(visible(&deck), ["B", "C", "D"]);

        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(drag(&mut deck, -150.0, t1), DragResult::Committed(Direction::Left));
        assert_eq!(deck.handler().declined, ["B"]);
        deck.tick(t1 + SETTLE);
        assert_eq!(visible(&deck), ["C", "D", "E"]);

        let t2 = t1 + Duration::from_secs(1);
        assert_eq!(drag(&mut deck, 50.0, t2), DragResult::Cancelled);
        deck.tick(t2 + SETTLE);
        assert_eq!(visible(&deck), ["C", "D", "E"]);
        assert_eq!(deck.handler().affirmed, ["A"]);
        assert_eq!(deck.handler().declined, ["B"]);
        assert_eq!(deck.queue().cursor(), 2);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = SwipeDeck::<InviteVerdict, _>::new(
            items(&["x", "x"]),
            DeckConfig::invites(),
            Recorder::default(),
        );
        assert!(matches!(result, Err(DeckError::Queue(QueueError::DuplicateId(_)))));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = DeckConfig {
            stack_depth: 0,
            ..DeckConfig::invites()
        };
        let result = SwipeDeck::<InviteVerdict, _>::new(items(&["a"]), config, Recorder::default());
        assert!(matches!(result, Err(DeckError::Tuning(TuningError::EmptyStack))));
    }

    #[test]
    fn stale_commit_during_settle_is_tolerated() {
        let mut deck = deck(&["A", "B", "C"]);
        let now = Instant::now();

        deck.swipe(Direction::Right, now);
        let stale = deck.commit(&"A".parse().unwrap(), Direction::Right, now);
        assert_eq!(stale, CommitOutcome::Duplicate("A".parse().unwrap()));

        deck.tick(now + SETTLE);
        deck.tick(now + SETTLE * 2);
        assert_eq!(deck.handler().affirmed, ["A"]);
        assert_eq!(deck.queue().cursor(), 1);
        assert_eq!(visible(&deck), ["B", "C"]);
    }

    #[test]
    fn commit_below_top_keeps_top_card() {
        let mut deck = deck(&["A", "B", "C", "D", "E"]);
        let now = Instant::now();

        let outcome = deck.commit(&"C".parse().unwrap(), Direction::Right, now);
        assert_eq!(outcome, CommitOutcome::NotTop("C".parse().unwrap()));
        deck.tick(now + SETTLE);

        assert_eq!(visible(&deck), ["A", "B", "C"]);
        assert_eq!(deck.queue().cursor(), 0);
        assert!(deck.decisions().is_empty());
        assert!(deck.handler().affirmed.is_empty());
        assert!(!deck.is_exhausted());
    }

    #[test]
    fn processed_card_leaves_stack_before_settle() {
        let mut deck = deck(&["A", "B", "C", "D"]);
        let now = Instant::now();
        deck.swipe(Direction::Left, now);
        assert!(deck.is_settling());
        assert_eq!(visible(&deck), ["B", "C", "D"]);
        assert_eq!(deck.queue().cursor(), 0);
    }

    #[test]
    fn drag_on_non_top_card_is_ignored() {
        let mut deck = deck(&["A", "B"]);
        let b: ItemId = "B".parse().unwrap();
        assert!(!deck.pointer_down(P, 0.0, 0.0, Some(&b)));
        assert!(deck.pointer_move(P, 300.0, 0.0).is_none());
        assert_eq!(deck.pointer_up(P, Instant::now()), DragResult::Ignored);
        assert!(deck.handler().affirmed.is_empty());
    }

    #[test]
    fn second_input_source_is_ignored() {
        let mut deck = deck(&["A", "B"]);
        let now = Instant::now();
        assert!(deck.pointer_down(P, 0.0, 0.0, None));
        assert!(!deck.pointer_down(T, 0.0, 0.0, None));
        assert!(deck.pointer_move(T, 400.0, 0.0).is_none());
        assert_eq!(deck.pointer_up(T, now), DragResult::Ignored);
        assert!(deck.is_dragging());

        deck.pointer_move(P, -30.0, 0.0);
        assert_eq!(deck.pointer_up(P, now), DragResult::Cancelled);
        assert!(deck.pointer_down(T, 0.0, 0.0, None));
    }

    #[test]
    fn swipe_ignored_while_dragging() {
        let mut deck = deck(&["A"]);
        deck.pointer_down(P, 0.0, 0.0, None);
        assert!(deck.swipe(Direction::Right, Instant::now()).is_none());
    }

    #[test]
    fn top_layer_carries_feedback() {
        let mut deck = deck(&["A", "B", "C", "D"]);
        deck.pointer_down(P, 0.0, 0.0, None);
        deck.pointer_move(P, 150.0, 0.0);

        let layers = deck.layers();
        assert_eq!(layers.len(), 3);
        assert!(layers[0].is_top());
        assert_eq!(layers[0].feedback.offset.x, 150.0);
        assert_eq!(layers[0].feedback.hint, Some(Direction::Right));
        assert_eq!(layers[1].feedback, Feedback::REST);
        assert!((layers[1].scale - 0.95).abs() < 1e-6);
        assert!((layers[2].opacity - 0.7).abs() < 1e-6);
    }

    #[test]
    fn reset_cancels_pending_settle() {
        let mut deck = deck(&["A", "B", "C", "D"]);
        let now = Instant::now();
        deck.swipe(Direction::Right, now);
        deck.reset();
        deck.tick(now + SETTLE);

        assert_eq!(deck.queue().cursor(), 0);
        assert_eq!(visible(&deck), ["A", "B", "C"]);

        deck.swipe(Direction::Left, now + SETTLE);
        assert_eq!(deck.handler().affirmed, ["A"]);
        assert_eq!(deck.handler().declined, ["A"]);
    }

    #[test]
    fn exhaustion_reported_once() {
        let mut deck = deck(&["A", "B"]);
        let now = Instant::now();
        deck.swipe(Direction::Right, now);
        deck.swipe(Direction::Right, now);
        assert!(deck.swipe(Direction::Right, now).is_none());

        deck.tick(now + SETTLE);
        deck.tick(now + SETTLE * 2);
        let exhausted = deck
            .drain_events()
            .into_iter()
            .filter(|e| *e == DeckEvent::Exhausted)
            .count();
        assert_eq!(exhausted, 1);
        assert!(deck.is_exhausted());
        assert!(deck.layers().is_empty());
        assert!(deck.layers().is_empty());
    }

    #[test]
    fn handler_failure_surfaces_separately() {
        let mut deck = SwipeDeck::<InviteVerdict, _>::new(
            items(&["A", "B"]),
            DeckConfig::invites(),
            Recorder {
                fail: true,
                ..Recorder::default()
            },
        )
        .unwrap();
        let now = Instant::now();

        deck.swipe(Direction::Right, now);
        deck.tick(now + SETTLE);

        let failures = deck.drain_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].item_id.as_str(), "A");
        assert!(deck.drain_failures().is_empty());
        assert_eq!(visible(&deck), ["B"]);
    }

    #[test]
    fn teardown_drops_pending_advances() {
        let mut deck = deck(&["A", "B"]);
        let now = Instant::now();
        deck.swipe(Direction::Right, now);
        assert!(deck.is_settling());

        let decisions = deck.teardown();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].verdict, InviteVerdict::Accept);
    }

    #[test]
    fn pointer_cancel_springs_back() {
        let mut deck = deck(&["A"]);
        deck.pointer_down(P, 0.0, 0.0, None);
        deck.pointer_move(P, 500.0, 0.0);
        assert!(deck.pointer_cancel(P));
        assert!(!deck.is_dragging());
        assert_eq!(
            deck.drain_events(),
            vec![DeckEvent::DragCancelled("A".parse().unwrap())]
        );
        assert_eq!(deck.layers()[0].feedback, Feedback::REST);
    }

    #[test]
    fn people_deck_uses_invite_and_pass() {
        let mut deck = SwipeDeck::<PersonVerdict, _>::new(
            items(&["p1", "p2"]),
            DeckConfig::people(),
            Recorder::default(),
        )
        .unwrap();
        let now = Instant::now();
        deck.swipe(Direction::Right, now);
        deck.swipe(Direction::Left, now);

        let verdicts: Vec<_> = deck.decisions().iter().map(|d| d.verdict).collect();
        assert_eq!(verdicts, [PersonVerdict::Invite, PersonVerdict::Pass]);
    }
}
