use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// The mvnup configuration file structure (mvnup.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MvnupConfig {
    /// Maven install configuration
    pub maven: MavenConfig,
}

/// Maven-specific configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MavenConfig {
    /// Maven version to install (e.g. "3.9.9")
    pub version: Option<String>,

    /// Directory under which the versioned install directory is created
    pub install_root: Option<String>,

    /// Base URL of the downloads host
    pub mirror: Option<String>,
}

impl MvnupConfig {
    /// Load configuration from mvnup.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join("mvnup.toml");

            if config_path.exists() {
                let content = std::fs::read_to_string(&config_path)?;
                let config: MvnupConfig = toml::from_str(&content)?;
                return Ok(Some(config));
            }

            if !current.pop() {
                // Reached filesystem root, no config found
                return Ok(None);
            }
        }
    }

    /// Load configuration by searching upward from the current working directory
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }
}
