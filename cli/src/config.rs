use anyhow::{Context, Result};
use matchmaster_core::GameConfig;
use std::fs;
use std::path::Path;

pub fn load(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Rules from TOML; missing keys keep their defaults.
pub fn parse(text: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
