//! Drag gesture tracking
//!
//! Turns a pointer or touch stream into live feedback (offset, rotation,
//! opacity) and a single commit decision on release.
//!
//! ```text
//! Idle --begin_drag(top card)--> Dragging --end_drag--> Idle
//!                                    |                 (Committed | Cancelled)
//!                                    +--cancel-------> Idle
//! ```
//!
//! Stray events are expected from a UI event stream, so calls that do not
//! fit the current phase are ignored rather than reported as errors.

use serde::{Deserialize, Serialize};

use super::tuning::DeckConfig;
use super::verdict::Direction;

/// Origin of a continuous input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Pointer,
    Touch,
}

impl InputSource {
    pub fn label(&self) -> &'static str {
        match self {
            InputSource::Pointer => "pointer",
            InputSource::Touch => "touch",
        }
    }
}

/// A 2D point or displacement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Visual parameters for the card being dragged
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feedback {
    pub offset: Vec2,
    pub rotation_degrees: f32,
    pub opacity: f32,
    /// Direction a release would commit to right now
    pub hint: Option<Direction>,
}

impl Feedback {
    /// Feedback for a card at rest
    pub const REST: Feedback = Feedback {
        offset: Vec2::ZERO,
        rotation_degrees: 0.0,
        opacity: 1.0,
        hint: None,
    };
}

/// Outcome of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResult {
    /// Threshold met; the card leaves in this direction
    Committed(Direction),
    /// Below threshold; the card springs back
    Cancelled,
    /// No drag from this source was active
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    source: InputSource,
    start: Vec2,
    offset: Vec2,
}

/// Phase of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging(DragState),
}

/// Gesture parameters copied out of [`DeckConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
struct Limits {
    commit_threshold: f32,
    max_rotation: f32,
    reference_width: f32,
    fade_distance: f32,
    min_opacity: f32,
}

impl From<&DeckConfig> for Limits {
    fn from(config: &DeckConfig) -> Self {
        Self {
            commit_threshold: config.commit_threshold_px,
            max_rotation: config.max_rotation_degrees,
            reference_width: config.reference_width_px,
            fade_distance: config.fade_distance_px,
            min_opacity: config.min_opacity,
        }
    }
}

/// Drag state machine for the top card
#[derive(Debug, Clone)]
pub struct GestureTracker {
    limits: Limits,
    phase: Phase,
}

impl GestureTracker {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            limits: Limits::from(config),
            phase: Phase::Idle,
        }
    }

    /// Starts a drag; returns false (and does nothing) unless idle on the top card
    pub fn begin_drag(&mut self, source: InputSource, x: f32, y: f32, is_top_card: bool) -> bool {
        if !is_top_card || self.is_dragging() {
            return false;
        }
        self.phase = Phase::Dragging(DragState {
            source,
            start: Vec2::new(x, y),
            offset: Vec2::ZERO,
        });
        true
    }

    /// Moves the drag; ignored unless dragging with the same source
    pub fn update_drag(&mut self, source: InputSource, x: f32, y: f32) -> Option<Feedback> {
        let Phase::Dragging(state) = &mut self.phase else {
            return None;
        };
        if state.source != source {
            return None;
        }
        state.offset = Vec2::new(x - state.start.x, y - state.start.y);
        Some(self.feedback())
    }

    /// Releases the drag and decides whether it committed
    pub fn end_drag(&mut self, source: InputSource) -> DragResult {
        let Phase::Dragging(state) = self.phase else {
            return DragResult::Ignored;
        };
        if state.source != source {
            return DragResult::Ignored;
        }
        self.phase = Phase::Idle;

        match self.committing_direction(state.offset.x) {
            Some(direction) => DragResult::Committed(direction),
            None => DragResult::Cancelled,
        }
    }

    /// Abandons any drag in progress; returns true if one was active
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.phase = Phase::Idle;
        was_dragging
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Source that owns the current drag
    pub fn active_source(&self) -> Option<InputSource> {
        match self.phase {
            Phase::Dragging(state) => Some(state.source),
            Phase::Idle => None,
        }
    }

    /// Current offset; zero when idle
    pub fn offset(&self) -> Vec2 {
        match self.phase {
            Phase::Dragging(state) => state.offset,
            Phase::Idle => Vec2::ZERO,
        }
    }

    /// Live visual parameters for the current offset
    pub fn feedback(&self) -> Feedback {
        let offset = self.offset();
        Feedback {
            offset,
            rotation_degrees: self.rotation_for(offset.x),
            opacity: self.opacity_for(offset.x),
            hint: self.committing_direction(offset.x),
        }
    }

    pub fn commit_threshold(&self) -> f32 {
        self.limits.commit_threshold
    }

    fn rotation_for(&self, dx: f32) -> f32 {
        let max = self.limits.max_rotation;
        (dx / self.limits.reference_width * max).clamp(-max, max)
    }

    fn opacity_for(&self, dx: f32) -> f32 {
        (1.0 - dx.abs() / self.limits.fade_distance).clamp(self.limits.min_opacity, 1.0)
    }

    // A zero offset never commits: the threshold is validated positive.
    fn committing_direction(&self, dx: f32) -> Option<Direction> {
        if dx.abs() >= self.limits.commit_threshold {
            Direction::from_offset(dx)
        } else {
            None
        }
    }
}
