//! Idle-triggered highlight cycler
//!
//! Watches qualifying input. After `idle_limit` without any, the cards are
//! captured and highlighted one at a time every `cycle_interval`, wrapping
//! around forever. Any input stops the cycle and restores the cards.
//!
//! The cycler owns exactly two timer slots. Every rearm cancels the
//! previous timer of the same kind first, and fired ids that no longer
//! match a slot are dropped, so overlapping cycles cannot occur.

use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cycler::config::CyclerConfig;
use crate::cycler::shift::ColumnShift;
use crate::cycler::style::CardStyle;
use crate::schedule::{Scheduler, TimerId, TimerKind};
use crate::surface::{CardId, CardSurface};

/// Input that counts as user activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEvent {
    /// Page finished loading
    Load,
    /// Pointer moved anywhere on the page
    MouseMove,
    /// Click anywhere on the page
    Click,
}

impl FromStr for InputEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" => Ok(Self::Load),
            "mousemove" | "move" => Ok(Self::MouseMove),
            "click" => Ok(Self::Click),
            other => bail!("Unknown input event '{other}' (expected load, move or click)"),
        }
    }
}

/// Run state of the cycler itself, not of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclerState {
    /// Waiting for the idle threshold
    Idle,
    /// Auto-cycle running
    Active,
}

/// Observable transition produced by a cycler handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CyclerEvent {
    /// Idle timer (re)armed
    IdleArmed {
        /// Milliseconds until the idle check fires
        after_ms: u64,
    },
    /// Idle threshold reached and cards were found
    CycleStarted {
        /// Size of the captured card set
        cards: usize,
    },
    /// Idle threshold reached but no cards were present
    CycleAbandoned,
    /// A cycle tick raised one card
    Highlighted {
        /// Position of the card in the captured set
        index: usize,
        /// Grid column of the card
        column: usize,
        /// Horizontal shift applied
        shift: ColumnShift,
    },
    /// Input arrived while cycling
    CycleStopped {
        /// Index the next tick would have highlighted
        at_index: usize,
    },
    /// The cycler was disposed
    Disposed,
}

/// Idle detector and highlight cycler for one page
#[derive(Debug)]
pub struct IdleCycler<S, C> {
    config: CyclerConfig,
    scheduler: S,
    surface: C,
    state: CyclerState,
    cards: Vec<CardId>,
    current_index: usize,
    idle_timer: Option<TimerId>,
    cycle_timer: Option<TimerId>,
    disposed: bool,
}

impl<S: Scheduler, C: CardSurface> IdleCycler<S, C> {
    /// Create an idle cycler with no timers armed
    #[must_use]
    pub fn new(config: CyclerConfig, scheduler: S, surface: C) -> Self {
        Self {
            config,
            scheduler,
            surface,
            state: CyclerState::Idle,
            cards: Vec::new(),
            current_index: 0,
            idle_timer: None,
            cycle_timer: None,
            disposed: false,
        }
    }

    /// Begin watching for idleness. Behaves like a page `load` event.
    pub fn start(&mut self) -> Vec<CyclerEvent> {
        self.on_input(InputEvent::Load)
    }

    /// Handle a qualifying input event.
    ///
    /// Stops a running cycle, then rearms the idle timer.
    pub fn on_input(&mut self, event: InputEvent) -> Vec<CyclerEvent> {
        if self.disposed {
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.state == CyclerState::Active {
            debug!(?event, "input while cycling");
            self.stop_cycle(&mut events);
        }
        self.arm_idle_timer(&mut events);
        events
    }

    /// Handle a fired timer. Ids the cycler no longer holds are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Vec<CyclerEvent> {
        if self.disposed {
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.idle_timer == Some(id) {
            self.idle_timer = None;
            self.idle_elapsed(&mut events);
        } else if self.cycle_timer == Some(id) {
            self.tick(&mut events);
        } else {
            debug!(%id, "ignoring stale timer");
        }
        events
    }

    /// Cancel both timers and restore the cards. Later calls are no-ops.
    pub fn dispose(&mut self) -> Vec<CyclerEvent> {
        if self.disposed {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(id) = self.idle_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.state == CyclerState::Active {
            self.stop_cycle(&mut events);
        }
        self.disposed = true;
        events.push(CyclerEvent::Disposed);
        events
    }

    fn arm_idle_timer(&mut self, events: &mut Vec<CyclerEvent>) {
        if let Some(previous) = self.idle_timer.take() {
            self.scheduler.cancel(previous);
        }
        let delay = self.config.idle_limit();
        self.idle_timer = Some(self.scheduler.schedule_once(delay, TimerKind::IdleCheck));
        events.push(CyclerEvent::IdleArmed {
            after_ms: self.config.timing.idle_limit_ms,
        });
    }

    fn idle_elapsed(&mut self, events: &mut Vec<CyclerEvent>) {
        if self.state == CyclerState::Active {
            return;
        }

        let cards = self.surface.query_cards();
        if cards.is_empty() {
            info!("idle threshold reached but no cards to cycle");
            events.push(CyclerEvent::CycleAbandoned);
            // Keep checking every idle limit until cards show up
            self.arm_idle_timer(events);
            return;
        }

        info!(cards = cards.len(), "idle threshold reached, starting cycle");
        let count = cards.len();
        self.cards = cards;
        self.current_index = 0;
        self.state = CyclerState::Active;

        if let Some(stale) = self.cycle_timer.take() {
            self.scheduler.cancel(stale);
        }
        self.cycle_timer = Some(
            self.scheduler
                .schedule_repeating(self.config.cycle_interval(), TimerKind::CycleTick),
        );
        events.push(CyclerEvent::CycleStarted { cards: count });
    }

    fn tick(&mut self, events: &mut Vec<CyclerEvent>) {
        let Some(&card) = self.cards.get(self.current_index) else {
            return;
        };

        self.reset_cards();

        let index = self.current_index;
        let columns = self.config.grid.columns.max(1);
        let column = index % columns;
        let shift = ColumnShift::for_index(index, columns);
        debug!(index, column, %shift, "highlighting card");

        self.surface
            .apply_style(card, &CardStyle::highlighted(shift, &self.config));
        self.surface.scroll_into_view(card);

        self.current_index = (index + 1) % self.cards.len();
        events.push(CyclerEvent::Highlighted {
            index,
            column,
            shift,
        });
    }

    fn stop_cycle(&mut self, events: &mut Vec<CyclerEvent>) {
        if let Some(id) = self.cycle_timer.take() {
            self.scheduler.cancel(id);
        }
        self.reset_cards();

        info!(at_index = self.current_index, "user activity, cycle stopped");
        events.push(CyclerEvent::CycleStopped {
            at_index: self.current_index,
        });
        self.state = CyclerState::Idle;
        self.cards.clear();
    }

    fn reset_cards(&mut self) {
        let resting = CardStyle::resting(&self.config);
        for card in &self.cards {
            self.surface.apply_style(*card, &resting);
        }
    }
}

impl<S, C> IdleCycler<S, C> {
    /// Current run state
    #[must_use]
    pub const fn state(&self) -> CyclerState {
        self.state
    }

    /// Index the next tick will highlight
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Size of the captured card set (zero while idle)
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Pending idle timer, if any
    #[must_use]
    pub const fn idle_timer(&self) -> Option<TimerId> {
        self.idle_timer
    }

    /// Pending cycle timer, if any
    #[must_use]
    pub const fn cycle_timer(&self) -> Option<TimerId> {
        self.cycle_timer
    }

    /// Whether `dispose` has been called
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &CyclerConfig {
        &self.config
    }

    /// Underlying scheduler
    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Underlying scheduler, mutably
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Underlying card surface
    #[must_use]
    pub const fn surface(&self) -> &C {
        &self.surface
    }

    /// Underlying card surface, mutably
    pub fn surface_mut(&mut self) -> &mut C {
        &mut self.surface
    }
}
