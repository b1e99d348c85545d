//! Card surfaces
//!
//! A [`CardSurface`] is whatever displays the cards: a browser document, a
//! terminal, or an in-memory recorder in tests. The cycler only queries
//! the card list and writes styles through this trait.

pub mod recording;
pub mod terminal;

use serde::{Deserialize, Serialize};

use crate::cycler::style::CardStyle;

pub use recording::RecordingSurface;
pub use terminal::TerminalSurface;

/// Handle of a card on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub usize);

/// Display that holds the cards being cycled
///
/// Operations on cards the surface no longer knows about are no-ops.
pub trait CardSurface {
    /// Current cards in display order
    fn query_cards(&mut self) -> Vec<CardId>;

    /// Replace the inline style of `card`
    fn apply_style(&mut self, card: CardId, style: &CardStyle);

    /// Smoothly scroll `card` to the centre of the viewport
    fn scroll_into_view(&mut self, card: CardId);
}
