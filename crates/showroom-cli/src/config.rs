//! CLI configuration.
//!
//! A small TOML file holds the three paths everything else hangs off: the
//! database, the assets directory (template pages plus coordinate
//! side-cars), and the output directory for generated documents. Every path
//! can be overridden per invocation by flag or environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowroomConfig {
    pub showroom: ShowroomSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowroomSection {
    pub db_path: String,
    pub assets_dir: String,
    pub output_dir: String,
}

impl ShowroomConfig {
    pub fn new(db_path: PathBuf, assets_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            showroom: ShowroomSection {
                db_path: db_path.to_string_lossy().to_string(),
                assets_dir: assets_dir.to_string_lossy().to_string(),
                output_dir: output_dir.to_string_lossy().to_string(),
            },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("showroom.db"))
}

pub fn default_assets_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("assets"))
}

pub fn default_output_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("documents"))
}

pub fn read_config(path: &Path) -> anyhow::Result<ShowroomConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &ShowroomConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("showroom"));
        }
    }
    Ok(home_dir()?.join(".config").join("showroom"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("showroom"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("showroom"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
