//! Swipe queue
//!
//! Owns the ordered working set of items, the set of processed IDs and
//! the cursor. The cursor only moves forward until [`SwipeQueue::reset`].
//!
//! Mutation is expected from a single owner (the UI thread). Hosts that
//! share a queue across threads must serialize access themselves.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::id::ItemId;
use super::item::{Item, ItemStatus};

#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("Duplicate item ID: {0}")]
    DuplicateId(ItemId),

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Item already processed: {0}")]
    AlreadyProcessed(ItemId),
}

impl QueueError {
    /// Returns true for errors callers should treat as success
    pub fn is_benign(&self) -> bool {
        matches!(self, QueueError::AlreadyProcessed(_))
    }

    /// Returns true for errors caused by bad input at construction
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, QueueError::DuplicateId(_))
    }
}

/// Ordered, deduplicated set of decidable items
#[derive(Debug, Clone)]
pub struct SwipeQueue {
    items: Vec<Item>,

    /// Map from ItemId to position in `items`
    index: HashMap<ItemId, usize>,

    processed: HashSet<ItemId>,

    cursor: usize,
}

impl SwipeQueue {
    /// Builds a queue from an ordered list of items
    ///
    /// Fails if two items share an ID; no queue is created in that case.
    pub fn initialize(items: Vec<Item>) -> Result<Self, QueueError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), pos).is_some() {
                return Err(QueueError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self {
            items,
            index,
            processed: HashSet::new(),
            cursor: 0,
        })
    }

    /// Returns up to `depth` unprocessed items starting at the cursor
    ///
    /// An empty result is the terminal "all done" state.
    pub fn visible_stack(&self, depth: usize) -> Vec<&Item> {
        self.items
            .iter()
            .skip(self.cursor)
            .filter(|item| !self.processed.contains(&item.id))
            .take(depth)
            .collect()
    }

    /// Returns the item currently eligible for gestures
    pub fn top(&self) -> Option<&Item> {
        self.visible_stack(1).into_iter().next()
    }

    /// Returns true if `id` is the current top-of-stack item
    pub fn is_top(&self, id: &ItemId) -> bool {
        self.top().is_some_and(|item| &item.id == id)
    }

    /// Records that a decision was committed for `id`
    ///
    /// Does not move the cursor.
    pub fn mark_processed(&mut self, id: &ItemId) -> Result<(), QueueError> {
        if !self.index.contains_key(id) {
            return Err(QueueError::NotFound(id.clone()));
        }
        if !self.processed.insert(id.clone()) {
            return Err(QueueError::AlreadyProcessed(id.clone()));
        }
        Ok(())
    }

    /// Moves the cursor forward by one, saturating at the end
    pub fn advance(&mut self) {
        if self.cursor < self.items.len() {
            self.cursor += 1;
        }
    }

    /// Clears the processed set and rewinds the cursor
    pub fn reset(&mut self) {
        self.processed.clear();
        self.cursor = 0;
    }

    /// True when the cursor has passed the last item or everything left is processed
    pub fn is_exhausted(&self) -> bool {
        self.items[self.cursor.min(self.items.len())..]
            .iter()
            .all(|item| self.processed.contains(&item.id))
    }

    /// Returns the lifecycle status of an item
    pub fn status(&self, id: &ItemId) -> Option<ItemStatus> {
        if !self.index.contains_key(id) {
            return None;
        }
        Some(if self.processed.contains(id) {
            ItemStatus::Processed
        } else {
            ItemStatus::Pending
        })
    }

    pub fn is_processed(&self, id: &ItemId) -> bool {
        self.processed.contains(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up an item by ID
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Number of items not yet decided
    pub fn remaining(&self) -> usize {
        self.items.len() - self.processed.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(id.parse().unwrap())).collect()
    }

    fn id(s: &str) -> ItemId {
        s.parse().unwrap()
    }

    fn visible_ids(queue: &SwipeQueue, depth: usize) -> Vec<String> {
        queue
            .visible_stack(depth)
            .iter()
            .map(|item| item.id.to_string())
            .collect()
    }

    #[test]
    fn initialize_rejects_duplicates() {
        let err = SwipeQueue::initialize(items(&["x", "x"])).unwrap_err();
        assert_eq!(err, QueueError::DuplicateId(id("x")));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn initialize_starts_at_zero() {
        let queue = SwipeQueue::initialize(items(&["a", "b"])).unwrap();
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.processed_count(), 0);
        assert_eq!(queue.status(&id("a")), Some(ItemStatus::Pending));
    }

    #[test]
    fn visible_stack_takes_depth_from_cursor() {
        let mut queue = SwipeQueue::initialize(items(&["A", "B", "C", "D", "E"])).unwrap();
        assert_eq!(visible_ids(&queue, 3), ["A", "B", "C"]);

        queue.mark_processed(&id("A")).unwrap();
        queue.advance();
        assert_eq!(visible_ids(&queue, 3), ["B", "C", "D"]);
    }

    #[test]
    fn visible_stack_skips_processed_ahead_of_cursor() {
        let mut queue = SwipeQueue::initialize(items(&["A", "B", "C", "D"])).unwrap();
        queue.mark_processed(&id("B")).unwrap();
        assert_eq!(visible_ids(&queue, 3), ["A", "C", "D"]);
    }

    #[test]
    fn visible_stack_short_near_end() {
        let mut queue = SwipeQueue::initialize(items(&["A", "B"])).unwrap();
        queue.mark_processed(&id("A")).unwrap();
        queue.advance();
        assert_eq!(visible_ids(&queue, 3), ["B"]);
    }

    #[test]
    fn mark_processed_twice_is_benign() {
        let mut queue = SwipeQueue::initialize(items(&["x"])).unwrap();
        queue.mark_processed(&id("x")).unwrap();

        let err = queue.mark_processed(&id("x")).unwrap_err();
        assert!(err.is_benign());
        assert_eq!(queue.processed_count(), 1);
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn mark_processed_unknown_id() {
        let mut queue = SwipeQueue::initialize(items(&["x"])).unwrap();
        assert_eq!(
            queue.mark_processed(&id("y")),
            Err(QueueError::NotFound(id("y")))
        );
        assert_eq!(queue.processed_count(), 0);
    }

    #[test]
    fn advance_saturates() {
        let mut queue = SwipeQueue::initialize(items(&["a"])).unwrap();
        queue.advance();
        queue.advance();
        queue.advance();
        assert_eq!(queue.cursor(), 1);
        assert!(queue.is_exhausted());
        assert!(queue.visible_stack(3).is_empty());
    }

    #[test]
    fn exhausted_when_remaining_all_processed() {
        let mut queue = SwipeQueue::initialize(items(&["a", "b"])).unwrap();
        queue.mark_processed(&id("a")).unwrap();
        queue.mark_processed(&id("b")).unwrap();
        assert_eq!(queue.cursor(), 0);
        assert!(queue.is_exhausted());
        assert!(queue.visible_stack(3).is_empty());
    }

    #[test]
    fn empty_queue_is_exhausted() {
        let queue = SwipeQueue::initialize(Vec::new()).unwrap();
        assert!(queue.is_exhausted());
        assert!(queue.top().is_none());
    }

    #[test]
    fn reset_replays_from_start() {
        let mut queue = SwipeQueue::initialize(items(&["A", "B", "C", "D"])).unwrap();
        for name in ["A", "B", "C", "D"] {
            queue.mark_processed(&id(name)).unwrap();
            queue.advance();
        }
        assert!(queue.is_exhausted());

        queue.reset();
        assert_eq!(visible_ids(&queue, 3), ["A", "B", "C"]);
        assert!(queue.mark_processed(&id("A")).is_ok());
    }

    #[test]
    fn top_and_lookup() {
        let queue = SwipeQueue::initialize(items(&["a", "b"])).unwrap();
        assert!(queue.is_top(&id("a")));
        assert!(!queue.is_top(&id("b")));
        assert_eq!(queue.get(&id("b")).map(|i| i.id.as_str()), Some("b"));
        assert!(queue.get(&id("z")).is_none());
        assert_eq!(queue.status(&id("z")), None);
        assert_eq!(queue.remaining(), 2);
    }
}
