//! Terminal card surface
//!
//! Lays the cards out in a fixed-column grid and redraws it on stderr each
//! time a card is scrolled into view. Stdout stays free for piping.

use colored::Colorize;

use super::{CardId, CardSurface};
use crate::cycler::style::CardStyle;

const CELL_WIDTH: usize = 16;

/// Card grid drawn with ANSI colors
#[derive(Debug)]
pub struct TerminalSurface {
    labels: Vec<String>,
    styles: Vec<Option<CardStyle>>,
    columns: usize,
}

impl TerminalSurface {
    /// Create a grid from card labels
    #[must_use]
    pub fn new(labels: Vec<String>, columns: usize) -> Self {
        let styles = vec![None; labels.len()];
        Self {
            labels,
            styles,
            columns: columns.max(1),
        }
    }

    /// Create a grid of `count` cards labelled `Card 1`, `Card 2`, ...
    #[must_use]
    pub fn numbered(count: usize, columns: usize) -> Self {
        let labels = (1..=count).map(|n| format!("Card {n}")).collect();
        Self::new(labels, columns)
    }

    /// Render the grid as text, one line per row
    #[must_use]
    pub fn render_grid(&self) -> String {
        let mut out = String::new();
        for (row, chunk) in self.labels.chunks(self.columns).enumerate() {
            for (col, label) in chunk.iter().enumerate() {
                let index = row * self.columns + col;
                out.push_str(&self.render_cell(index, label));
            }
            out.push('\n');
        }
        out
    }

    fn render_cell(&self, index: usize, label: &str) -> String {
        let short: String = label.chars().take(CELL_WIDTH - 4).collect();
        match self.styles.get(index).copied().flatten() {
            Some(style) if style.is_raised() => {
                let text = format!("[{} {short}]", style.translate_x.arrow());
                format!("{:<width$}", text, width = CELL_WIDTH)
                    .bold()
                    .yellow()
                    .to_string()
            }
            _ => format!("{:<width$}", format!(" {short} "), width = CELL_WIDTH)
                .dimmed()
                .to_string(),
        }
    }
}

impl CardSurface for TerminalSurface {
    fn query_cards(&mut self) -> Vec<CardId> {
        (0..self.labels.len()).map(CardId).collect()
    }

    fn apply_style(&mut self, card: CardId, style: &CardStyle) {
        if let Some(slot) = self.styles.get_mut(card.0) {
            *slot = Some(*style);
        }
    }

    fn scroll_into_view(&mut self, card: CardId) {
        let Some(label) = self.labels.get(card.0) else {
            return;
        };
        eprintln!("{}", "─".repeat(CELL_WIDTH * self.columns).dimmed());
        eprint!("{}", self.render_grid());
        eprintln!("  {} {}", "▶".blue(), label.bold());
    }
}
