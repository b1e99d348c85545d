//! Rich CLI display for cycler transitions
//!
//! Renders cycler events and doctor reports as human-readable terminal
//! output. Callers print to stderr so stdout remains clean for piping.

use colored::Colorize;

use crate::cycler::machine::CyclerEvent;
use crate::doctor::{DiagnosticReport, Severity};
use crate::simulation::TimedEvent;

/// Format a millisecond offset as `m:ss.mmm`
#[must_use]
pub fn format_offset(ms: u64) -> String {
    let mins = ms / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{mins}:{secs:02}.{millis:03}")
}

/// Render one transition as a single line
#[must_use]
pub fn render_event(at_ms: u64, event: &CyclerEvent) -> String {
    let stamp = format_offset(at_ms).dimmed();
    let body = match event {
        CyclerEvent::IdleArmed { after_ms } => {
            format!("idle check in {}", format_offset(*after_ms))
                .dimmed()
                .to_string()
        }
        CyclerEvent::CycleStarted { cards } => {
            format!("{} over {cards} card(s)", "CYCLE STARTED".green().bold())
        }
        CyclerEvent::CycleAbandoned => {
            format!("{} no cards found", "⚠".yellow().bold())
        }
        CyclerEvent::Highlighted {
            index,
            column,
            shift,
        } => format!(
            "{} card {} {}",
            "▶".blue(),
            index.to_string().bold(),
            format!("(column {column}, shift {shift})").dimmed()
        ),
        CyclerEvent::CycleStopped { at_index } => format!(
            "{} {}",
            "CYCLE STOPPED".red().bold(),
            format!("next card would have been {at_index}").dimmed()
        ),
        CyclerEvent::Disposed => "disposed".dimmed().to_string(),
    };
    format!("  {stamp}  {body}")
}

/// Render the summary printed after a simulation
#[must_use]
pub fn render_run_summary(events: &[TimedEvent], end_ms: u64) -> String {
    let mut started = 0;
    let mut highlights = 0;
    let mut stopped = 0;
    let mut abandoned = 0;
    for timed in events {
        match timed.event {
            CyclerEvent::CycleStarted { .. } => started += 1,
            CyclerEvent::Highlighted { .. } => highlights += 1,
            CyclerEvent::CycleStopped { .. } => stopped += 1,
            CyclerEvent::CycleAbandoned => abandoned += 1,
            CyclerEvent::IdleArmed { .. } | CyclerEvent::Disposed => {}
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", "─".repeat(50).dimmed()));
    out.push_str(&format!(
        "  {} {started} cycle(s) | {highlights} highlight(s) | {stopped} stop(s) | {}\n",
        "Stats:".dimmed(),
        format_offset(end_ms)
    ));
    if abandoned > 0 {
        out.push_str(&format!(
            "  {} {abandoned} idle check(s) found no cards\n",
            "⚠".yellow().bold()
        ));
    }
    out
}

/// Render a doctor report
#[must_use]
pub fn render_diagnostic_report(report: &DiagnosticReport) -> String {
    let mut out = String::new();

    if report.is_clean() {
        out.push_str(&format!("{} No issues found\n", "✓".green().bold()));
        return out;
    }

    for finding in &report.findings {
        let label = match finding.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        out.push_str(&format!(
            "{label}[{}]: {}\n",
            finding.code, finding.message
        ));
        if let Some(ref suggestion) = finding.suggestion {
            out.push_str(&format!("  {} {suggestion}\n", "→".dimmed()));
        }
    }

    out.push_str(&format!(
        "\n{} error(s), {} warning(s), {} info\n",
        report.error_count(),
        report.warning_count(),
        report.info_count()
    ));
    out
}
