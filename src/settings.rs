use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_BASE, NameQuery};
use crate::app::DEFAULT_PAGE_DELAY;

const APP_SENTINEL: &str = "jokes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_delay_ms: Option<u64>,

    #[serde(default)]
    pub surface_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            theme: None,
            first_name: None,
            last_name: None,
            api_base: None,
            page_delay_ms: None,
            surface_errors: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Settings written by `config init`: every key spelled out with its default.
    pub fn starter() -> Self {
        let name = NameQuery::default();
        Self {
            first_name: Some(name.first),
            last_name: Some(name.last),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            page_delay_ms: Some(DEFAULT_PAGE_DELAY.as_millis() as u64),
            ..Default::default()
        }
    }

    /// The name to fetch jokes for, given optional command line overrides.
    /// Blank parts fall back to the default name.
    pub fn name(&self, first: Option<&str>, last: Option<&str>) -> NameQuery {
        let default = NameQuery::default();
        let first = first
            .or(self.first_name.as_deref())
            .unwrap_or(default.first.as_str());
        let last = last
            .or(self.last_name.as_deref())
            .unwrap_or(default.last.as_str());
        NameQuery::parse(first, last).unwrap_or(default)
    }

    pub fn api_base<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.or(self.api_base.as_deref()).unwrap_or(DEFAULT_API_BASE)
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAGE_DELAY)
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("jokes")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("jokes.log")
}
