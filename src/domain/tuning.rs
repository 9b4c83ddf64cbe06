//! Deck tuning parameters
//!
//! Distances are in pixel-equivalent units; the terminal front end scales
//! cell coordinates into the same units before feeding the tracker.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::verdict::DeckKind;

#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be within 0..=1, got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("stack_depth must be at least 1")]
    EmptyStack,
}

/// Gesture and stack parameters for one deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Minimum |dx| for a release to commit
    pub commit_threshold_px: f32,

    /// Rotation cap in degrees (applied symmetrically)
    pub max_rotation_degrees: f32,

    /// Horizontal distance at which rotation reaches its cap
    pub reference_width_px: f32,

    /// Horizontal distance over which the card fades to `min_opacity`
    pub fade_distance_px: f32,

    /// Opacity floor while dragging
    pub min_opacity: f32,

    /// Pause between a commit and the queue advancing
    pub settle_delay_ms: u64,

    /// Number of cards rendered in the stack
    pub stack_depth: usize,

    /// Scale reduction per layer below the top card
    pub stack_scale_step: f32,

    /// Opacity reduction per layer below the top card
    pub stack_opacity_step: f32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            commit_threshold_px: 100.0,
            max_rotation_degrees: 15.0,
            reference_width_px: 300.0,
            fade_distance_px: 300.0,
            min_opacity: 0.5,
            settle_delay_ms: 300,
            stack_depth: 3,
            stack_scale_step: 0.05,
            stack_opacity_step: 0.15,
        }
    }
}

impl DeckConfig {
    /// Preset for reviewing invites
    pub fn invites() -> Self {
        Self::default()
    }

    /// Preset for people discovery (livelier tilt)
    pub fn people() -> Self {
        Self {
            max_rotation_degrees: 30.0,
            ..Self::default()
        }
    }

    /// Preset for a deck kind
    pub fn for_kind(kind: DeckKind) -> Self {
        match kind {
            DeckKind::Invites => Self::invites(),
            DeckKind::People => Self::people(),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Checks that every parameter is usable
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("commit_threshold_px", self.commit_threshold_px),
            ("max_rotation_degrees", self.max_rotation_degrees),
            ("reference_width_px", self.reference_width_px),
            ("fade_distance_px", self.fade_distance_px),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let unit = [
            ("min_opacity", self.min_opacity),
            ("stack_scale_step", self.stack_scale_step),
            ("stack_opacity_step", self.stack_opacity_step),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::OutOfUnitRange { field, value });
            }
        }

        if self.stack_depth == 0 {
            return Err(TuningError::EmptyStack);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DeckConfig::invites().validate().is_ok());
        assert!(DeckConfig::people().validate().is_ok());
    }

    #[test]
    fn presets_differ_in_rotation() {
        assert_eq!(DeckConfig::for_kind(DeckKind::Invites).max_rotation_degrees, 15.0);
        assert_eq!(DeckConfig::for_kind(DeckKind::People).max_rotation_degrees, 30.0);
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = DeckConfig {
            commit_threshold_px: 0.0,
            ..DeckConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotPositive { field: "commit_threshold_px", .. })
        ));
    }

    #[test]
    fn nan_rejected() {
        let config = DeckConfig {
            fade_distance_px: f32::NAN,
            ..DeckConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn opacity_out_of_range_rejected() {
        let config = DeckConfig {
            min_opacity: 1.5,
            ..DeckConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::OutOfUnitRange { field: "min_opacity", .. })
        ));
    }

    #[test]
    fn zero_depth_rejected() {
        let config = DeckConfig {
            stack_depth: 0,
            ..DeckConfig::default()
        };
        assert_eq!(config.validate(), Err(TuningError::EmptyStack));
    }

    #[test]
    fn settle_delay_duration() {
        assert_eq!(DeckConfig::default().settle_delay(), Duration::from_millis(300));
    }
}
