// ABOUTME: Application configuration loaded from ckl.toml with sensible defaults
// Covers checklist/session locations, logging and the container wrapper settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "ckl.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory that holds `.ckl` files; `from:` names resolve against it
    pub lists_root: PathBuf,
    /// Directory that mirrors `lists_root` with session snapshots
    pub sessions_root: PathBuf,
    pub log_file: PathBuf,
    pub docker: DockerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Engine address, e.g. `unix:///var/run/docker.sock`; falls back to DOCKER_HOST
    pub host: Option<String>,
    pub image: String,
    pub container_name: String,
    /// In-container path the host working directory is bound to
    pub mount_path: String,
    pub shell: String,
    pub dockerfile: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lists_root: PathBuf::from("lists"),
            sessions_root: PathBuf::from("sessions"),
            log_file: PathBuf::from("ckl.log"),
            docker: DockerConfig::default(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: None,
            image: "ckl".to_string(),
            container_name: "ckl".to_string(),
            mount_path: "/ckl".to_string(),
            shell: "/bin/bash".to_string(),
            dockerfile: "Dockerfile".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `./ckl.toml`, then the user config directory, then defaults.
    pub fn load() -> Result<Self> {
        for candidate in Self::search_paths() {
            if candidate.exists() {
                return Self::load_from(&candidate);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ckl").join("config.toml"));
        }
        paths
    }
}
