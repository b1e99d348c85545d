//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::cycler::machine::CyclerEvent;
use crate::log::jsonl::TraceEntry;
use chrono::Utc;

/// Create a `TraceEntry` for testing, stamped with the current time.
#[must_use]
pub fn make_test_entry(sequence: u64, at_ms: u64, event: CyclerEvent) -> TraceEntry {
    TraceEntry {
        sequence,
        at_ms,
        timestamp: Utc::now(),
        event,
    }
}
