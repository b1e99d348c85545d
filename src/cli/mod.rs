//! CLI output formatting
//!
//! Provides human-readable terminal display for cycler traces and
//! doctor reports, plus the commented config written by `tilecycle init`.

pub mod display;
pub mod init;

pub use display::render_diagnostic_report;
pub use display::render_event;
pub use display::render_run_summary;
pub use init::default_config_document;
