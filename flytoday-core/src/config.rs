use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    provider::aviationweather::{DEFAULT_ENDPOINT, DEFAULT_HOURS_BEFORE_NOW},
    templates::{BuiltinTemplateStore, TemplateStore, TomlTemplateStore},
};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://www.aviationweather.gov/adds/dataserver_current/httpparam"
/// hours_before_now = 3
/// timeout_secs = 10
/// templates_path = "/etc/flytoday/responses.toml"
/// bind = "0.0.0.0:8080"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ADDS data server base URL.
    pub endpoint: String,

    /// How far back the data server looks for the most recent report.
    pub hours_before_now: u32,

    /// HTTP timeout; absent means the transport default.
    pub timeout_secs: Option<u64>,

    /// Response template file; absent means the built-in phrases.
    pub templates_path: Option<PathBuf>,

    /// Listen address of the webhook server.
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            hours_before_now: DEFAULT_HOURS_BEFORE_NOW,
            timeout_secs: None,
            templates_path: None,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "flytoday", "flytoday")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.endpoint.trim().is_empty(),
            "Config error: endpoint must not be empty"
        );
        ensure!(
            self.hours_before_now >= 1,
            "Config error: hours_before_now must be at least 1, got {}",
            self.hours_before_now
        );
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Template store selected by `templates_path`.
    pub fn template_store(&self) -> Box<dyn TemplateStore> {
        match &self.templates_path {
            Some(path) => Box::new(TomlTemplateStore::new(path)),
            None => Box::new(BuiltinTemplateStore),
        }
    }
}
