//! Timer scheduling
//!
//! The cycler never sleeps. It asks a [`Scheduler`] for timers and the
//! host hands fired timer ids back through `IdleCycler::on_timer`.

pub mod tokio_timer;
pub mod virtual_clock;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use tokio_timer::{run_loop, TokioScheduler};
pub use virtual_clock::VirtualScheduler;

/// Handle of a scheduled timer. Ids are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Single-shot idle detection
    IdleCheck,
    /// Repeating highlight advance
    CycleTick,
}

/// Source of one-shot and repeating timers
pub trait Scheduler {
    /// Fire `id` once after `delay`
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId;

    /// Fire `id` every `period`, first after one full period
    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId;

    /// Stop a timer. Unknown or already finished ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Monotonic id source shared by the scheduler implementations
#[derive(Debug, Default)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub(crate) fn next_id(&mut self) -> TimerId {
        self.next += 1;
        TimerId(self.next)
    }
}
