//! Card visual state
//!
//! The inline style the cycler writes onto a card: a transform, a stacking
//! order and the transition that animates between them.

use std::time::Duration;

use crate::cycler::config::CyclerConfig;
use crate::cycler::shift::ColumnShift;

/// Stacking order of every card that is not highlighted
pub const RESTING_Z_INDEX: i32 = 1;

/// Inline style of a single card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardStyle {
    /// Uniform scale factor
    pub scale: f32,
    /// Horizontal translation
    pub translate_x: ColumnShift,
    /// Stacking order
    pub z_index: i32,
    /// Transform transition duration in milliseconds
    pub transition_ms: u64,
}

impl CardStyle {
    /// Default appearance: natural size, no translation, resting z-index
    #[must_use]
    pub const fn resting(config: &CyclerConfig) -> Self {
        Self {
            scale: 1.0,
            translate_x: ColumnShift::None,
            z_index: RESTING_Z_INDEX,
            transition_ms: config.highlight.transition_ms,
        }
    }

    /// Enlarged appearance of the card currently in the spotlight
    #[must_use]
    pub const fn highlighted(shift: ColumnShift, config: &CyclerConfig) -> Self {
        Self {
            scale: config.highlight.scale,
            translate_x: shift,
            z_index: config.highlight.z_index,
            transition_ms: config.highlight.transition_ms,
        }
    }

    /// Whether this style lifts the card above its neighbours
    #[must_use]
    pub const fn is_raised(&self) -> bool {
        self.z_index > RESTING_Z_INDEX
    }

    /// CSS `transform` value, e.g. `scale(2) translateX(50%)`
    #[must_use]
    pub fn transform_css(&self) -> String {
        if self.is_raised() {
            format!("scale({}) translateX({})", self.scale, self.translate_x.css())
        } else {
            format!("scale({})", self.scale)
        }
    }

    /// CSS `transition` value, e.g. `transform 0.5s`
    #[must_use]
    pub fn transition_css(&self) -> String {
        let secs = Duration::from_millis(self.transition_ms).as_secs_f64();
        format!("transform {secs}s")
    }
}
