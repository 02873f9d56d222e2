//! Init command - write a default project config

use anyhow::{Context, Result};
use console::style;
use slop_detector::config::{Config, CONFIG_FILE_NAMES};
use std::path::{Path, PathBuf};

const HEADER: &str = "\
# slop-detector configuration
#
# weights must sum to 1.0. Thresholds are (critical, warning) pairs.
# Disable patterns by id under [patterns], e.g. disabled = [\"todo_comment\"].

";

fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAMES[0])
}

/// Render the default configuration as commented TOML
pub(super) fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;
    Ok(format!("{}{}", HEADER, body))
}

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let target = config_path(&dir);
    if target.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(target.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&target, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("{} Created {}", style("✓").green(), style(target.display()).cyan());
    Ok(())
}
