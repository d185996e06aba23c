mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Returns `armband-axis/` inside the user config directory, creating it if needed.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("armband-axis");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: `config.toml` in [`config_dir`].
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from a specific file, or return default if it does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load config from disk. On first run, write the defaults so there is a
/// file to edit.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if path.exists() {
        return load_config_from(&path);
    }
    let config = AppConfig::default();
    save_config_to(&path, &config)?;
    Ok(config)
}

/// Save config to a specific file.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}
