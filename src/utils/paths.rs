use anyhow::{Context, Result};
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "containerdev.yaml";

/// Default config file location (e.g. ~/.config/containerdev.yaml on Linux)
pub fn default_config_file() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not find the user config directory")?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}
