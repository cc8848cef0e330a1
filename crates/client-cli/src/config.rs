use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// How often `dashboard --watch` refreshes the application list
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hostel", "hostel")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = project_dirs()?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Set a value by its `config set` key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => self.api.base_url = value.to_string(),
            "poll_interval" => {
                self.dashboard.poll_interval_secs = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("poll_interval must be a number of seconds"))?
            }
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: api_url, poll_interval", key),
        }
        Ok(())
    }

    /// Read a value by its `config get` key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api.base_url.clone()),
            "poll_interval" => Ok(self.dashboard.poll_interval_secs.to_string()),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
    }
}
