//! Column shift policy
//!
//! A highlighted card grows in place, so cards on the grid edges are
//! nudged toward the middle to stay on screen.

use serde::{Deserialize, Serialize};

/// Horizontal translation applied to a highlighted card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnShift {
    /// Leftmost column, translate right by half a card
    Right,
    /// Interior column, no translation
    #[default]
    None,
    /// Rightmost column, translate left by half a card
    Left,
}

impl ColumnShift {
    /// Shift for the card at `index` in a grid of `columns` columns.
    ///
    /// The first column wins over the last, so a single-column grid
    /// always shifts right.
    #[must_use]
    pub const fn for_index(index: usize, columns: usize) -> Self {
        let columns = if columns == 0 { 1 } else { columns };
        let column = index % columns;
        if column == 0 {
            Self::Right
        } else if column == columns - 1 {
            Self::Left
        } else {
            Self::None
        }
    }

    /// Signed translation as a percentage of the card width
    #[must_use]
    pub const fn percent(self) -> i8 {
        match self {
            Self::Right => 50,
            Self::None => 0,
            Self::Left => -50,
        }
    }

    /// CSS length for `translateX(..)`
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Right => "50%",
            Self::None => "0%",
            Self::Left => "-50%",
        }
    }

    /// Arrow used by terminal renderers
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Right => "→",
            Self::None => "·",
            Self::Left => "←",
        }
    }
}

impl std::fmt::Display for ColumnShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Right => write!(f, "+50%"),
            Self::None => write!(f, "0"),
            Self::Left => write!(f, "-50%"),
        }
    }
}
