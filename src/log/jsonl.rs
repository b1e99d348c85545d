//! JSONL (JSON Lines) trace of cycler transitions
//!
//! Provides append-only logging of cycler events to `<dir>/trace.jsonl`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::cycler::machine::CyclerEvent;
use crate::simulation::TimedEvent;

/// A single recorded cycler transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceEntry {
    /// Position in the trace (1-indexed)
    pub sequence: u64,
    /// Milliseconds since the cycler started (simulated or wall clock)
    pub at_ms: u64,
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
    /// The transition itself
    #[serde(flatten)]
    pub event: CyclerEvent,
}

impl TraceEntry {
    /// Build an entry stamped with the current wall-clock time
    #[must_use]
    pub fn new(sequence: u64, at_ms: u64, event: CyclerEvent) -> Self {
        Self {
            sequence,
            at_ms,
            timestamp: Utc::now(),
            event,
        }
    }
}

/// JSONL logger for cycler traces
///
/// Each line is a JSON object representing a single transition.
#[derive(Debug)]
pub struct TraceLogger {
    log_path: PathBuf,
    next_sequence: u64,
}

impl TraceLogger {
    /// Create a new trace logger
    ///
    /// # Arguments
    /// * `log_dir` - Directory where trace.jsonl will be stored
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be created
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("trace.jsonl");

        // Continue numbering after entries from earlier runs
        let existing = if log_path.exists() {
            fs::read_to_string(&log_path)
                .with_context(|| format!("Failed to read trace file: {}", log_path.display()))?
                .lines()
                .filter(|line| !line.trim().is_empty())
                .count() as u64
        } else {
            0
        };

        Ok(Self {
            log_path,
            next_sequence: existing + 1,
        })
    }

    /// Append an entry to the trace
    ///
    /// # Errors
    /// Returns an error if:
    /// - The trace file cannot be opened or created
    /// - The entry cannot be serialized to JSON
    /// - Writing to the file fails
    pub fn append(&self, entry: &TraceEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open trace file: {}", self.log_path.display()))?;

        let json = serde_json::to_string(entry).context("Failed to serialize trace entry")?;

        writeln!(file, "{json}").context("Failed to write to trace file")?;

        Ok(())
    }

    /// Record an event, numbering it after everything this logger wrote
    pub fn record(&mut self, at_ms: u64, event: CyclerEvent) -> Result<TraceEntry> {
        let entry = TraceEntry::new(self.next_sequence, at_ms, event);
        self.append(&entry)?;
        self.next_sequence += 1;
        Ok(entry)
    }

    /// Record a batch of simulated events
    pub fn record_all(&mut self, events: &[TimedEvent]) -> Result<Vec<TraceEntry>> {
        events
            .iter()
            .map(|timed| self.record(timed.at_ms, timed.event.clone()))
            .collect()
    }

    /// Read all entries from the trace
    ///
    /// # Returns
    /// A vector of all entries, in the order they were written
    ///
    /// # Errors
    /// Returns an error if:
    /// - The trace file cannot be read
    /// - Any line cannot be parsed as valid JSON
    pub fn read_all(&self) -> Result<Vec<TraceEntry>> {
        // If the trace doesn't exist yet, return empty vector
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read trace file: {}", self.log_path.display()))?;

        let mut entries = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let entry: TraceEntry = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Get the path to the trace file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
