//! Logging and observability
//!
//! This module provides the JSONL trace of cycler transitions. Diagnostic
//! logging goes through `tracing`; see [`init_tracing`].

pub mod jsonl;

use tracing_subscriber::EnvFilter;

pub use jsonl::{TraceEntry, TraceLogger};

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
/// Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "tilecycle=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
