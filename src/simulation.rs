//! Deterministic simulation
//!
//! Runs an [`IdleCycler`] on a [`VirtualScheduler`] so a scripted sequence
//! of inputs can be replayed against simulated time.

use serde::{Deserialize, Serialize};

use crate::cycler::config::CyclerConfig;
use crate::cycler::machine::{CyclerEvent, IdleCycler, InputEvent};
use crate::schedule::VirtualScheduler;
use crate::surface::CardSurface;

/// A cycler event stamped with the simulated time it happened at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Simulated time in milliseconds
    pub at_ms: u64,
    /// What happened
    pub event: CyclerEvent,
}

/// A cycler driven by a simulated clock
#[derive(Debug)]
pub struct Simulation<C> {
    cycler: IdleCycler<VirtualScheduler, C>,
}

impl<C: CardSurface> Simulation<C> {
    /// Create a simulation at t = 0
    #[must_use]
    pub fn new(config: CyclerConfig, surface: C) -> Self {
        Self {
            cycler: IdleCycler::new(config, VirtualScheduler::new(), surface),
        }
    }

    /// Start the cycler at the current simulated time
    pub fn start(&mut self) -> Vec<TimedEvent> {
        let events = self.cycler.start();
        self.stamp(events)
    }

    /// Deliver an input at the current simulated time
    pub fn input(&mut self, event: InputEvent) -> Vec<TimedEvent> {
        let events = self.cycler.on_input(event);
        self.stamp(events)
    }

    /// Advance to `at_ms`, then deliver an input.
    ///
    /// Timers due at exactly `at_ms` fire before the input.
    pub fn input_at(&mut self, at_ms: u64, event: InputEvent) -> Vec<TimedEvent> {
        let mut out = self.advance_to(at_ms);
        out.extend(self.input(event));
        out
    }

    /// Fire every timer due up to and including `until_ms`
    pub fn advance_to(&mut self, until_ms: u64) -> Vec<TimedEvent> {
        let mut out = Vec::new();
        while let Some((at_ms, id, _)) = self.cycler.scheduler_mut().pop_due(until_ms) {
            out.extend(
                self.cycler
                    .on_timer(id)
                    .into_iter()
                    .map(|event| TimedEvent { at_ms, event }),
            );
        }
        self.cycler.scheduler_mut().advance_to(until_ms);
        out
    }

    /// Advance the clock by `ms`
    pub fn advance_by(&mut self, ms: u64) -> Vec<TimedEvent> {
        let until = self.now_ms().saturating_add(ms);
        self.advance_to(until)
    }

    /// Dispose the cycler at the current simulated time
    pub fn dispose(&mut self) -> Vec<TimedEvent> {
        let events = self.cycler.dispose();
        self.stamp(events)
    }

    /// Current simulated time in milliseconds
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.cycler.scheduler().now_ms()
    }

    /// The cycler under simulation
    #[must_use]
    pub const fn cycler(&self) -> &IdleCycler<VirtualScheduler, C> {
        &self.cycler
    }

    /// The card surface
    #[must_use]
    pub const fn surface(&self) -> &C {
        self.cycler.surface()
    }

    /// The card surface, mutably
    pub fn surface_mut(&mut self) -> &mut C {
        self.cycler.surface_mut()
    }

    fn stamp(&self, events: Vec<CyclerEvent>) -> Vec<TimedEvent> {
        let at_ms = self.now_ms();
        events
            .into_iter()
            .map(|event| TimedEvent { at_ms, event })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycler::machine::CyclerState;
    use crate::cycler::shift::ColumnShift;
    use crate::surface::{CardId, RecordingSurface};

    fn highlights(events: &[TimedEvent]) -> Vec<(usize, ColumnShift)> {
        events
            .iter()
            .filter_map(|e| match e.event {
                CyclerEvent::Highlighted { index, shift, .. } => Some((index, shift)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_seven_cards_visit_in_order_then_wrap() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(7));
        sim.start();
        sim.advance_to(60_000);

        let events = sim.advance_by(8 * 5_000);
        let visited = highlights(&events);

        let indices: Vec<usize> = visited.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6, 0]);

        let shifts: Vec<String> = visited[..7].iter().map(|(_, s)| s.to_string()).collect();
        assert_eq!(shifts, vec!["+50%", "0", "-50%", "+50%", "0", "-50%", "+50%"]);
    }

    #[test]
    fn test_n_ticks_return_index_to_start() {
        for n in 1..=9 {
            let mut sim =
                Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(n));
            sim.start();
            sim.advance_to(60_000);
            let before = sim.cycler().current_index();

            let events = sim.advance_by(n as u64 * 5_000);
            let mut indices: Vec<usize> = highlights(&events).iter().map(|(i, _)| *i).collect();
            indices.sort_unstable();

            assert_eq!(indices, (0..n).collect::<Vec<_>>(), "n = {n}");
            assert_eq!(sim.cycler().current_index(), before, "n = {n}");
        }
    }

    #[test]
    fn test_events_carry_timestamps() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(2));
        let started = sim.start();
        assert_eq!(started[0].at_ms, 0);

        let events = sim.advance_to(70_000);
        let times: Vec<u64> = events.iter().map(|e| e.at_ms).collect();
        assert_eq!(times, vec![60_000, 65_000, 70_000]);
        assert_eq!(sim.now_ms(), 70_000);
    }

    #[test]
    fn test_click_at_index_four_of_seven() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(7));
        sim.start();
        // Four ticks highlight 0..=3, leaving index 4 next
        sim.advance_to(80_000);
        assert_eq!(sim.cycler().current_index(), 4);

        let events = sim.input_at(82_000, InputEvent::Click);
        assert_eq!(events[0].event, CyclerEvent::CycleStopped { at_index: 4 });
        assert_eq!(sim.cycler().state(), CyclerState::Idle);
        assert_eq!(sim.cycler().cycle_timer(), None);

        for card in 0..7 {
            let style = sim.surface().style_of(CardId(card)).unwrap();
            assert!((style.scale - 1.0).abs() < f32::EPSILON);
            assert_eq!(style.z_index, 1);
        }
    }

    #[test]
    fn test_zero_cards_never_activates() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(0));
        sim.start();

        let events = sim.advance_to(300_000);
        assert!(events
            .iter()
            .all(|e| matches!(e.event, CyclerEvent::CycleAbandoned | CyclerEvent::IdleArmed { .. })));
        let abandoned = events
            .iter()
            .filter(|e| e.event == CyclerEvent::CycleAbandoned)
            .count();
        assert_eq!(abandoned, 5);
        assert_eq!(sim.cycler().state(), CyclerState::Idle);
        assert_eq!(sim.cycler().cycle_timer(), None);
    }

    #[test]
    fn test_input_at_fires_due_timers_first() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(3));
        sim.start();

        let events = sim.input_at(60_000, InputEvent::MouseMove);
        let kinds: Vec<&CyclerEvent> = events.iter().map(|e| &e.event).collect();
        assert_eq!(
            kinds,
            vec![
                &CyclerEvent::CycleStarted { cards: 3 },
                &CyclerEvent::CycleStopped { at_index: 0 },
                &CyclerEvent::IdleArmed { after_ms: 60_000 },
            ]
        );
    }

    #[test]
    fn test_dispose_stamps_current_time() {
        let mut sim = Simulation::new(CyclerConfig::default(), RecordingSurface::with_cards(3));
        sim.start();
        sim.advance_to(12_345);
        let events = sim.dispose();
        assert_eq!(
            events,
            vec![TimedEvent {
                at_ms: 12_345,
                event: CyclerEvent::Disposed,
            }]
        );
        assert!(sim.advance_by(120_000).is_empty());
    }
}
