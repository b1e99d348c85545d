//! Tilecycle doctor: diagnostics and health checks
//!
//! Audits `trace.jsonl` against the cycler's timing contract and lints
//! `tilecycle.toml`. Returns a structured report with categories:
//! errors (must fix), warnings (should fix), info (suggestions).

use crate::cycler::config::CyclerConfig;
use crate::cycler::machine::CyclerEvent;
use crate::log::TraceEntry;

/// Severity level for a diagnostic finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    /// Must fix, something is broken
    Error,
    /// Should fix, suboptimal configuration
    Warning,
    /// Suggestion, informational improvement
    Info,
}

/// A single diagnostic finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Severity of the finding
    pub severity: Severity,
    /// Short code for the finding (e.g., "T001")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Suggested fix (optional)
    pub suggestion: Option<String>,
}

/// Diagnostic report from `tilecycle doctor`
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    /// All findings, in order of severity (errors first)
    pub findings: Vec<Finding>,
}

impl DiagnosticReport {
    /// Returns true if the report has no findings at all
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns the number of errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(&Severity::Error)
    }

    /// Returns the number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(&Severity::Warning)
    }

    /// Returns the number of info items
    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(&Severity::Info)
    }

    fn count(&self, severity: &Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| &f.severity == severity)
            .count()
    }
}

/// Run all diagnostic checks and return a report.
#[must_use]
pub fn diagnose(config: &CyclerConfig, trace: &[TraceEntry]) -> DiagnosticReport {
    let mut findings = Vec::new();

    check_trace_sequence(trace, &mut findings);
    check_abandoned_attempts(trace, &mut findings);
    check_config_lint(config, &mut findings);

    // Sort: errors first, then warnings, then info
    findings.sort_by_key(|f| match f.severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    });

    DiagnosticReport { findings }
}

/// Whether `entry` opens a new run in a trace shared by several runs.
///
/// Every run starts by arming the idle timer at 0ms, and offsets never go
/// backwards within a run.
const fn starts_new_run(previous_ms: Option<u64>, entry: &TraceEntry) -> bool {
    match previous_ms {
        None => true,
        Some(previous) => {
            entry.at_ms < previous
                || (entry.at_ms == 0 && matches!(entry.event, CyclerEvent::IdleArmed { .. }))
        }
    }
}

/// T001-T003: Replay the trace and check that cycles never overlap,
/// never tick while stopped, and visit cards in order.
///
/// A run that was interrupted mid-cycle does not leak into the next one.
fn check_trace_sequence(trace: &[TraceEntry], findings: &mut Vec<Finding>) {
    // Card count of the running cycle, and the index its next tick must show
    let mut running: Option<(usize, usize)> = None;
    let mut previous_ms = None;

    for entry in trace {
        if starts_new_run(previous_ms, entry) {
            running = None;
        }
        previous_ms = Some(entry.at_ms);

        match entry.event {
            CyclerEvent::CycleStarted { cards } => {
                if running.is_some() {
                    findings.push(Finding {
                        severity: Severity::Error,
                        code: "T001".to_string(),
                        message: format!(
                            "Cycle started at {}ms (entry {}) while another cycle was still running",
                            entry.at_ms, entry.sequence
                        ),
                        suggestion: Some(
                            "The previous cycle timer was not cancelled before rearming".to_string(),
                        ),
                    });
                }
                running = Some((cards, 0));
            }
            CyclerEvent::Highlighted { index, .. } => match running {
                None => findings.push(Finding {
                    severity: Severity::Error,
                    code: "T002".to_string(),
                    message: format!(
                        "Card {index} highlighted at {}ms (entry {}) with no cycle running",
                        entry.at_ms, entry.sequence
                    ),
                    suggestion: Some(
                        "A cycle timer kept firing after user activity stopped the cycle"
                            .to_string(),
                    ),
                }),
                Some((cards, expected)) => {
                    if index != expected {
                        findings.push(Finding {
                            severity: Severity::Warning,
                            code: "T003".to_string(),
                            message: format!(
                                "Expected card {expected} at {}ms (entry {}) but card {index} was highlighted",
                                entry.at_ms, entry.sequence
                            ),
                            suggestion: Some(
                                "Check for duplicate cycle timers advancing the index".to_string(),
                            ),
                        });
                    }
                    running = Some((cards, (index + 1) % cards.max(1)));
                }
            },
            CyclerEvent::CycleStopped { .. } | CyclerEvent::Disposed => running = None,
            CyclerEvent::IdleArmed { .. } | CyclerEvent::CycleAbandoned => {}
        }
    }
}

/// T004: Count idle checks that found nothing to cycle
fn check_abandoned_attempts(trace: &[TraceEntry], findings: &mut Vec<Finding>) {
    let abandoned = trace
        .iter()
        .filter(|e| e.event == CyclerEvent::CycleAbandoned)
        .count();

    if abandoned > 0 {
        findings.push(Finding {
            severity: Severity::Info,
            code: "T004".to_string(),
            message: format!("{abandoned} idle check(s) found no cards to cycle"),
            suggestion: Some("Make sure the page renders its cards before going idle".to_string()),
        });
    }
}

/// C001-C003: Lint the config for settings that defeat the effect
fn check_config_lint(config: &CyclerConfig, findings: &mut Vec<Finding>) {
    let timing = &config.timing;

    if config.highlight.transition_ms >= timing.cycle_interval_ms {
        findings.push(Finding {
            severity: Severity::Warning,
            code: "C001".to_string(),
            message: format!(
                "Transition ({}ms) is not shorter than the cycle interval ({}ms)",
                config.highlight.transition_ms, timing.cycle_interval_ms
            ),
            suggestion: Some(
                "Lower highlight.transition_ms so each card settles before the next one".to_string(),
            ),
        });
    }

    if timing.cycle_interval_ms >= timing.idle_limit_ms {
        findings.push(Finding {
            severity: Severity::Warning,
            code: "C002".to_string(),
            message: format!(
                "Cycle interval ({}ms) is not shorter than the idle limit ({}ms)",
                timing.cycle_interval_ms, timing.idle_limit_ms
            ),
            suggestion: Some(
                "Raise timing.idle_limit_ms or lower timing.cycle_interval_ms".to_string(),
            ),
        });
    }

    if config.highlight.scale <= 1.0 {
        findings.push(Finding {
            severity: Severity::Info,
            code: "C003".to_string(),
            message: format!(
                "Highlight scale {} does not enlarge the card",
                config.highlight.scale
            ),
            suggestion: Some("Set highlight.scale above 1.0, e.g. `scale = 2.0`".to_string()),
        });
    }
}
