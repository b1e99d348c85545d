#![allow(missing_docs)]

use std::time::Duration;

use tempfile::TempDir;

use tilecycle::cycler::config::CyclerConfig;
use tilecycle::cycler::machine::{CyclerEvent, CyclerState, IdleCycler, InputEvent};
use tilecycle::doctor::diagnose;
use tilecycle::log::TraceLogger;
use tilecycle::schedule::{Scheduler, TimerId, TimerKind, VirtualScheduler};
use tilecycle::simulation::Simulation;
use tilecycle::surface::{CardId, RecordingSurface};

const TEST_CONFIG: &str = r"
[timing]
idle_limit_ms = 10000
cycle_interval_ms = 1000

[grid]
columns = 3
";

/// Integration test: a full simulated session, written to the trace and
/// audited by the doctor.
///
/// Tests the complete data flow: config → simulation → JSONL trace →
/// diagnose → clean report.
#[test]
fn test_simulated_session_end_to_end() {
    let config = CyclerConfig::parse(TEST_CONFIG).unwrap();
    let temp_dir = TempDir::new().unwrap();
    let mut logger = TraceLogger::new(temp_dir.path()).unwrap();

    // Step 1: idle, cycle through 7 cards, get interrupted, go idle again
    let mut sim = Simulation::new(config.clone(), RecordingSurface::with_cards(7));
    let mut events = sim.start();
    events.extend(sim.advance_to(19_500));
    events.extend(sim.input_at(19_600, InputEvent::Click));
    events.extend(sim.advance_to(40_000));
    events.extend(sim.dispose());

    // Step 2: persist the trace
    logger.record_all(&events).unwrap();

    // Step 3: read it back and audit
    let trace = logger.read_all().unwrap();
    assert_eq!(trace.len(), events.len());
    assert_eq!(trace.first().unwrap().sequence, 1);

    let report = diagnose(&config, &trace);
    assert!(report.is_clean(), "unexpected findings: {:?}", report.findings);

    // Two cycles ran; the first was stopped after 9 highlights
    let started = trace
        .iter()
        .filter(|e| matches!(e.event, CyclerEvent::CycleStarted { .. }))
        .count();
    assert_eq!(started, 2);
    assert!(trace
        .iter()
        .any(|e| e.event == CyclerEvent::CycleStopped { at_index: 2 }));
}

/// Scenario: 7 cards, 3 columns, 7 ticks then wrap.
#[test]
fn test_seven_card_scenario_shift_sequence() {
    let config = CyclerConfig::parse(TEST_CONFIG).unwrap();
    let mut sim = Simulation::new(config, RecordingSurface::with_cards(7));
    sim.start();
    sim.advance_to(10_000);

    let events = sim.advance_by(8_000);
    let ticks: Vec<(usize, String)> = events
        .iter()
        .filter_map(|e| match &e.event {
            CyclerEvent::Highlighted { index, shift, .. } => Some((*index, shift.to_string())),
            _ => None,
        })
        .collect();

    assert_eq!(
        ticks,
        vec![
            (0, "+50%".to_string()),
            (1, "0".to_string()),
            (2, "-50%".to_string()),
            (3, "+50%".to_string()),
            (4, "0".to_string()),
            (5, "-50%".to_string()),
            (6, "+50%".to_string()),
            (0, "+50%".to_string()),
        ]
    );
    assert_eq!(sim.surface().scrolls().len(), 8);
    assert_eq!(sim.surface().raised_cards(), vec![CardId(0)]);
}

/// Scenario: zero cards when the idle timer fires.
#[test]
fn test_zero_card_scenario_stays_idle() {
    let config = CyclerConfig::parse(TEST_CONFIG).unwrap();
    let mut sim = Simulation::new(config, RecordingSurface::with_cards(0));
    sim.start();

    let events = sim.advance_to(10_000);
    assert!(events.iter().any(|e| e.event == CyclerEvent::CycleAbandoned));
    assert_eq!(sim.cycler().state(), CyclerState::Idle);
    assert_eq!(sim.cycler().cycle_timer(), None);
    assert_eq!(sim.cycler().scheduler().pending_of(TimerKind::CycleTick), 0);

    // Cards arriving later are picked up by the next idle check
    sim.surface_mut().add_card();
    let events = sim.advance_to(20_000);
    assert!(events
        .iter()
        .any(|e| e.event == CyclerEvent::CycleStarted { cards: 1 }));
}

/// A burst of input leaves a single pending idle timer.
#[test]
fn test_input_burst_leaves_one_idle_timer() {
    let config = CyclerConfig::parse(TEST_CONFIG).unwrap();
    let mut sim = Simulation::new(config, RecordingSurface::with_cards(3));
    sim.start();
    for _ in 0..50 {
        sim.input(InputEvent::MouseMove);
    }

    assert_eq!(sim.cycler().scheduler().pending_count(), 1);
    assert_eq!(sim.cycler().scheduler().pending_of(TimerKind::IdleCheck), 1);
}

/// Scheduler whose `cancel` does nothing, standing in for a host that
/// fails to clear its timers.
#[derive(Debug, Default)]
struct LeakyScheduler {
    inner: VirtualScheduler,
}

impl Scheduler for LeakyScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.inner.schedule_once(delay, kind)
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        self.inner.schedule_repeating(period, kind)
    }

    fn cancel(&mut self, _id: TimerId) {}
}

fn pump_leaky(
    cycler: &mut IdleCycler<LeakyScheduler, RecordingSurface>,
    until_ms: u64,
) -> Vec<CyclerEvent> {
    let mut events = Vec::new();
    while let Some((_, id, _)) = cycler.scheduler_mut().inner.pop_due(until_ms) {
        events.extend(cycler.on_timer(id));
    }
    cycler.scheduler_mut().inner.advance_to(until_ms);
    events
}

/// Even when cancelled timers keep firing, stale ids never move the cycle.
#[test]
fn test_leaked_timers_do_not_double_cycle() {
    let config = CyclerConfig::parse(TEST_CONFIG).unwrap();
    let mut cycler = IdleCycler::new(
        config,
        LeakyScheduler::default(),
        RecordingSurface::with_cards(4),
    );

    cycler.start();
    // Restless user: five rearms, five leaked idle timers
    for _ in 0..5 {
        cycler.on_input(InputEvent::MouseMove);
    }
    let mut events = pump_leaky(&mut cycler, 12_500);
    events.extend(cycler.on_input(InputEvent::Click));
    events.extend(pump_leaky(&mut cycler, 30_000));

    let started = events
        .iter()
        .filter(|e| matches!(e, CyclerEvent::CycleStarted { .. }))
        .count();
    let highlights = events
        .iter()
        .filter(|e| matches!(e, CyclerEvent::Highlighted { .. }))
        .count();

    // 10s: start; 11s, 12s: ticks; 12.5s: click; 22.5s: restart; 23.5s..30s: 7 ticks
    assert_eq!(started, 2);
    assert_eq!(highlights, 2 + 7);
    assert_eq!(cycler.state(), CyclerState::Active);
    assert_eq!(cycler.current_index(), 7 % 4);
}

/// Config file on disk drives the simulation timings.
#[test]
fn test_config_from_file_controls_timing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tilecycle.toml");
    std::fs::write(&path, "[timing]\nidle_limit_ms = 2000\ncycle_interval_ms = 250\n").unwrap();

    let config = CyclerConfig::from_path(&path).unwrap();
    let mut sim = Simulation::new(config, RecordingSurface::with_cards(2));
    sim.start();

    let events = sim.advance_to(2_500);
    let times: Vec<u64> = events.iter().map(|e| e.at_ms).collect();
    assert_eq!(times, vec![2_000, 2_250, 2_500]);
}
