//! Simulated clock
//!
//! A [`Scheduler`] whose time only moves when the caller says so. Timers
//! are popped in due order, which lets a host replay minutes of idle
//! behaviour in microseconds and deterministically.

use std::time::Duration;

use super::{IdSequence, Scheduler, TimerId, TimerKind};

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    kind: TimerKind,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Registration order, breaks ties between timers due at the same instant
    order: u64,
}

/// Scheduler driven by explicit clock advances
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    ids: IdSequence,
    next_order: u64,
    pending: Vec<PendingTimer>,
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl VirtualScheduler {
    /// Create a clock at t = 0 with no timers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time in milliseconds
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still pending
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending timers of the given kind
    #[must_use]
    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|t| t.kind == kind).count()
    }

    /// Whether `id` is still scheduled
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Due time of the earliest pending timer
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.iter().map(|t| t.due_ms).min()
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Moves the clock to the timer's due time. Repeating timers are
    /// re-enqueued one period later; one-shot timers are removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, TimerId, TimerKind)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.order))
            .map(|(i, _)| i)?;

        let due_ms = self.pending[position].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        let fired = match self.pending[position].period_ms {
            Some(period) => {
                let order = self.take_order();
                let timer = &mut self.pending[position];
                timer.due_ms = timer.due_ms.saturating_add(period);
                timer.order = order;
                (timer.id, timer.kind)
            }
            None => {
                let timer = self.pending.swap_remove(position);
                (timer.id, timer.kind)
            }
        };

        Some((due_ms, fired.0, fired.1))
    }

    /// Move the clock forward without firing anything.
    ///
    /// Callers pop every timer due before `ms` first; the clock never runs
    /// backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    fn take_order(&mut self) -> u64 {
        self.next_order += 1;
        self.next_order
    }

    fn push(&mut self, delay: Duration, period_ms: Option<u64>, kind: TimerKind) -> TimerId {
        let id = self.ids.next_id();
        let order = self.take_order();
        self.pending.push(PendingTimer {
            id,
            kind,
            due_ms: self.now_ms.saturating_add(duration_ms(delay)),
            period_ms,
            order,
        });
        id
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.push(delay, None, kind)
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        // A zero period would fire forever at a single instant
        let period_ms = duration_ms(period).max(1);
        self.push(Duration::from_millis(period_ms), Some(period_ms), kind)
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|t| t.id != id);
    }
}
