//! `tilecycle init`: write a commented configuration file

use std::path::Path;

use anyhow::{bail, Context, Result};
use toml_edit::{value, DocumentMut, Item, Table};

use crate::cycler::config::CyclerConfig;

fn int(n: u64) -> Item {
    value(i64::try_from(n).unwrap_or(i64::MAX))
}

fn section(comment: &str) -> Table {
    let mut table = Table::new();
    table.decor_mut().set_prefix(format!("\n{comment}"));
    table
}

/// Build a commented TOML document holding `config`
#[must_use]
pub fn default_config_document(config: &CyclerConfig) -> DocumentMut {
    let mut doc = DocumentMut::new();

    let mut timing = section(
        "# How long the page must sit untouched before cards start cycling,\n\
         # and how long each card stays highlighted. Milliseconds.\n",
    );
    timing["idle_limit_ms"] = int(config.timing.idle_limit_ms);
    timing["cycle_interval_ms"] = int(config.timing.cycle_interval_ms);
    doc.insert("timing", Item::Table(timing));

    let mut grid = section(
        "# Column count of the card grid. Cards in the first column shift\n\
         # right when highlighted, cards in the last column shift left.\n",
    );
    grid["columns"] = int(config.grid.columns as u64);
    doc.insert("grid", Item::Table(grid));

    let mut highlight = section("# Appearance of the highlighted card.\n");
    highlight["scale"] = value(f64::from(config.highlight.scale));
    highlight["z_index"] = value(i64::from(config.highlight.z_index));
    highlight["transition_ms"] = int(config.highlight.transition_ms);
    doc.insert("highlight", Item::Table(highlight));

    doc
}

/// Write the default config to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let doc = default_config_document(&CyclerConfig::default());
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
