//! Configuration commands.

use std::path::Path;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Dump the configuration loaded from `path` to stdout.
pub fn dump(config: &CliConfig, path: &Path) -> CliResult<()> {
    println!("{}", render(config, path)?);
    Ok(())
}

fn render(config: &CliConfig, path: &Path) -> CliResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", path.display(), toml_str))
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
