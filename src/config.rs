use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::KukanError;
use crate::events::Room;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay before the canned reply shows up
    pub reply_delay_ms: u64,

    /// Start with the compact composer only
    pub start_minimized: bool,

    /// Room chip selected on startup
    pub default_room: Room,

    /// Seed the demo conversation instead of starting empty
    pub seed_demo: bool,

    /// Where tracing output goes while the TUI owns the terminal
    pub log_file: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Widest the expanded widget gets, in columns
    pub max_width: u16,
    /// Width of the minimized composer, in columns
    pub minimized_width: u16,
    pub show_pro_tips: bool,
    /// How long status notices stay visible
    pub notice_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_width: 100,
            minimized_width: 64,
            show_pro_tips: true,
            notice_secs: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reply_delay_ms: 1000,
            start_minimized: false,
            default_room: Room::Bedroom,
            seed_demo: false,
            log_file: kukan_home().join("kukan.log"),
            ui: UiConfig::default(),
        }
    }
}

/// `~/.kukan`, falling back to the working directory when there is no home
pub fn kukan_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kukan")
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        kukan_home().join("config.toml")
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, using defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<(), KukanError> {
        if self.ui.max_width < 40 {
            return Err(KukanError::InvalidConfig {
                field: "ui.max_width",
                reason: format!("{} is narrower than 40 columns", self.ui.max_width),
            });
        }
        if self.ui.minimized_width < 20 {
            return Err(KukanError::InvalidConfig {
                field: "ui.minimized_width",
                reason: format!("{} is narrower than 20 columns", self.ui.minimized_width),
            });
        }
        if self.reply_delay_ms > 60_000 {
            return Err(KukanError::InvalidConfig {
                field: "reply_delay_ms",
                reason: "replies must arrive within a minute".to_string(),
            });
        }
        Ok(())
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}
