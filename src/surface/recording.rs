//! In-memory card surface
//!
//! Keeps the latest style of every card and records each scroll, so the
//! visual effect of a cycle can be asserted without a display.

use std::collections::BTreeMap;

use super::{CardId, CardSurface};
use crate::cycler::style::CardStyle;

/// Card surface that stores styles instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    cards: BTreeMap<CardId, Option<CardStyle>>,
    next_card: usize,
    scrolls: Vec<CardId>,
    style_writes: usize,
}

impl RecordingSurface {
    /// Create a surface holding `count` unstyled cards
    #[must_use]
    pub fn with_cards(count: usize) -> Self {
        let mut surface = Self::default();
        for _ in 0..count {
            surface.add_card();
        }
        surface
    }

    /// Append a card and return its id
    pub fn add_card(&mut self) -> CardId {
        let id = CardId(self.next_card);
        self.next_card += 1;
        self.cards.insert(id, None);
        id
    }

    /// Remove a card. Returns false if it was not present.
    pub fn remove_card(&mut self, card: CardId) -> bool {
        self.cards.remove(&card).is_some()
    }

    /// Remove every card
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Number of cards present
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the surface has no cards
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Last style written to `card`, `None` if never styled or absent
    #[must_use]
    pub fn style_of(&self, card: CardId) -> Option<&CardStyle> {
        self.cards.get(&card).and_then(Option::as_ref)
    }

    /// Cards currently raised above their neighbours
    #[must_use]
    pub fn raised_cards(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|(_, style)| style.is_some_and(|s| s.is_raised()))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every card scrolled into view, in order
    #[must_use]
    pub fn scrolls(&self) -> &[CardId] {
        &self.scrolls
    }

    /// Total number of style writes
    #[must_use]
    pub const fn style_writes(&self) -> usize {
        self.style_writes
    }
}

impl CardSurface for RecordingSurface {
    fn query_cards(&mut self) -> Vec<CardId> {
        self.cards.keys().copied().collect()
    }

    fn apply_style(&mut self, card: CardId, style: &CardStyle) {
        if let Some(slot) = self.cards.get_mut(&card) {
            *slot = Some(*style);
            self.style_writes += 1;
        }
    }

    fn scroll_into_view(&mut self, card: CardId) {
        if self.cards.contains_key(&card) {
            self.scrolls.push(card);
        }
    }
}
