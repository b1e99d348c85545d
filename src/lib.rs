//! Tilecycle - Idle-triggered highlight cycler
//!
//! After a period without user input, tilecycle spotlights the cards of a
//! grid one at a time on a fixed interval, and stops the moment input
//! returns. The state machine is independent of any display or clock:
//! hosts plug in a [`Scheduler`] and a [`CardSurface`].

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod cycler;
pub mod doctor;
pub mod log;
pub mod schedule;
pub mod simulation;
pub mod surface;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use cycler::config::CyclerConfig;
pub use cycler::machine::{CyclerEvent, CyclerState, IdleCycler, InputEvent};
pub use cycler::shift::ColumnShift;
pub use cycler::style::CardStyle;
pub use doctor::{diagnose, DiagnosticReport};
pub use log::{TraceEntry, TraceLogger};
pub use schedule::{Scheduler, TimerId, TimerKind, TokioScheduler, VirtualScheduler};
pub use simulation::{Simulation, TimedEvent};
pub use surface::{CardId, CardSurface, RecordingSurface, TerminalSurface};
