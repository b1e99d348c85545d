//! Live timers on the tokio runtime
//!
//! Every timer is a spawned task that sends its id on a channel when it
//! fires; cancelling aborts the task. [`run_loop`] is the single consumer
//! of both the timer channel and the input channel, so cycler handlers
//! never run concurrently.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::{IdSequence, Scheduler, TimerId, TimerKind};
use crate::cycler::machine::{CyclerEvent, IdleCycler, InputEvent};
use crate::surface::CardSurface;

/// Scheduler backed by tokio tasks
#[derive(Debug)]
pub struct TokioScheduler {
    ids: IdSequence,
    fired: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its timers fire into.
    ///
    /// Must be used from within a tokio runtime.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (fired, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            ids: IdSequence::default(),
            fired,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    /// Number of timer tasks still running
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }

    fn track(&mut self, id: TimerId, handle: JoinHandle<()>) -> TimerId {
        self.tasks.retain(|_, h| !h.is_finished());
        self.tasks.insert(id, handle);
        id
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = self.ids.next_id();
        let tx = self.fired.clone();
        debug!(%id, ?kind, ?delay, "scheduling one-shot timer");
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            // Receiver gone means the loop has shut down
            let _ = tx.send(id);
        });
        self.track(id, handle)
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        let id = self.ids.next_id();
        let tx = self.fired.clone();
        let period = period.max(Duration::from_millis(1));
        debug!(%id, ?kind, ?period, "scheduling repeating timer");
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        self.track(id, handle)
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

/// Drive a cycler from live input until the input stream closes or
/// `shutdown` resolves.
///
/// Starts the cycler, then feeds it inputs and fired timers one at a time.
/// Inputs win ties so a click always lands before a simultaneous tick.
/// On exit the cycler is disposed, so a running cycle is always stopped
/// and its cards restored.
pub async fn run_loop<C, F, Fut>(
    cycler: &mut IdleCycler<TokioScheduler, C>,
    mut timers: mpsc::UnboundedReceiver<TimerId>,
    mut inputs: mpsc::Receiver<InputEvent>,
    shutdown: Fut,
    mut on_event: F,
) where
    C: CardSurface,
    F: FnMut(CyclerEvent),
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    cycler.start().into_iter().for_each(&mut on_event);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                debug!("shutdown requested");
                break;
            }
            input = inputs.recv() => match input {
                Some(event) => cycler.on_input(event).into_iter().for_each(&mut on_event),
                None => break,
            },
            Some(id) = timers.recv() => {
                cycler.on_timer(id).into_iter().for_each(&mut on_event);
            }
        }
    }

    cycler.dispose().into_iter().for_each(&mut on_event);
}
