//! Cycler configuration parser
//!
//! Parses `tilecycle.toml` into timing, grid and highlight settings.
//! Every key is optional; missing keys fall back to the page defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Idle detection and cycle timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Milliseconds without input before the cycle starts (default: 60000)
    #[serde(default = "default_idle_limit_ms")]
    pub idle_limit_ms: u64,
    /// Milliseconds between highlight advances (default: 5000)
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,
}

const fn default_idle_limit_ms() -> u64 {
    60_000
}

const fn default_cycle_interval_ms() -> u64 {
    5_000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            idle_limit_ms: default_idle_limit_ms(),
            cycle_interval_ms: default_cycle_interval_ms(),
        }
    }
}

/// Card grid layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Number of grid columns, used for the highlight shift direction (default: 3)
    #[serde(default = "default_columns")]
    pub columns: usize,
}

const fn default_columns() -> usize {
    3
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

/// Visual treatment of the highlighted card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HighlightConfig {
    /// Scale factor of the highlighted card (default: 2.0)
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Stacking order of the highlighted card (default: 10000)
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// Duration of the transform transition in milliseconds (default: 500)
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

const fn default_scale() -> f32 {
    2.0
}

const fn default_z_index() -> i32 {
    10_000
}

const fn default_transition_ms() -> u64 {
    500
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            z_index: default_z_index(),
            transition_ms: default_transition_ms(),
        }
    }
}

/// Top-level configuration parsed from tilecycle.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CyclerConfig {
    /// Idle detection and cycle timing
    #[serde(default)]
    pub timing: TimingConfig,
    /// Card grid layout
    #[serde(default)]
    pub grid: GridConfig,
    /// Highlight appearance
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl CyclerConfig {
    /// Parse a tilecycle.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load the config at `path`, or the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse tilecycle.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse tilecycle.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Idle threshold as a `Duration`
    #[must_use]
    pub const fn idle_limit(&self) -> Duration {
        Duration::from_millis(self.timing.idle_limit_ms)
    }

    /// Cycle interval as a `Duration`
    #[must_use]
    pub const fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.timing.cycle_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timing.idle_limit_ms == 0 {
            bail!("timing.idle_limit_ms must be greater than zero");
        }
        if self.timing.cycle_interval_ms == 0 {
            bail!("timing.cycle_interval_ms must be greater than zero");
        }
        if self.grid.columns == 0 {
            bail!("grid.columns must be at least 1");
        }
        if !self.highlight.scale.is_finite() || self.highlight.scale <= 0.0 {
            bail!(
                "highlight.scale must be a positive number, got {}",
                self.highlight.scale
            );
        }
        // Resting cards sit at z-index 1
        if self.highlight.z_index <= 1 {
            bail!(
                "highlight.z_index must be above the resting z-index 1, got {}",
                self.highlight.z_index
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r"
[timing]
idle_limit_ms = 30000
cycle_interval_ms = 2000

[grid]
columns = 4

[highlight]
scale = 1.5
z_index = 500
transition_ms = 250
";

    #[test]
    fn test_parse_full_config() {
        let config = CyclerConfig::parse(FULL_CONFIG).unwrap();

        assert_eq!(config.timing.idle_limit_ms, 30_000);
        assert_eq!(config.timing.cycle_interval_ms, 2_000);
        assert_eq!(config.grid.columns, 4);
        assert!((config.highlight.scale - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.highlight.z_index, 500);
        assert_eq!(config.highlight.transition_ms, 250);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CyclerConfig::parse("").unwrap();
        assert_eq!(config, CyclerConfig::default());
        assert_eq!(config.timing.idle_limit_ms, 60_000);
        assert_eq!(config.timing.cycle_interval_ms, 5_000);
        assert_eq!(config.grid.columns, 3);
        assert_eq!(config.highlight.z_index, 10_000);
        assert_eq!(config.highlight.transition_ms, 500);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = CyclerConfig::parse("[timing]\nidle_limit_ms = 1000\n").unwrap();
        assert_eq!(config.timing.idle_limit_ms, 1_000);
        assert_eq!(config.timing.cycle_interval_ms, 5_000);
        assert_eq!(config.grid.columns, 3);
    }

    #[test]
    fn test_durations() {
        let config = CyclerConfig::default();
        assert_eq!(config.idle_limit(), Duration::from_secs(60));
        assert_eq!(config.cycle_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_zero_idle_limit() {
        let result = CyclerConfig::parse("[timing]\nidle_limit_ms = 0\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("idle_limit_ms"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_zero_cycle_interval() {
        let result = CyclerConfig::parse("[timing]\ncycle_interval_ms = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_columns() {
        let result = CyclerConfig::parse("[grid]\ncolumns = 0\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("columns"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(CyclerConfig::parse("[highlight]\nscale = 0.0\n").is_err());
        assert!(CyclerConfig::parse("[highlight]\nscale = -2.0\n").is_err());
    }

    #[test]
    fn test_rejects_z_index_at_resting_level() {
        assert!(CyclerConfig::parse("[highlight]\nz_index = 1\n").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(CyclerConfig::parse("[grid]\nrows = 2\n").is_err());
        assert!(CyclerConfig::parse("[animation]\nspeed = 2\n").is_err());
    }

    #[test]
    fn test_from_path_missing_file_errors() {
        let result = CyclerConfig::from_path("/nonexistent/tilecycle.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = CyclerConfig::load_or_default("/nonexistent/tilecycle.toml").unwrap();
        assert_eq!(config, CyclerConfig::default());
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tilecycle.toml");
        std::fs::write(&path, FULL_CONFIG).unwrap();

        let config = CyclerConfig::from_path(&path).unwrap();
        assert_eq!(config.grid.columns, 4);
    }
}
