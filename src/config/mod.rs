//! Configuration management for satgame

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::quiz::DEFAULT_FEEDBACK_DELAY;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Question bank JSON file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_bank: Option<PathBuf>,

    /// Pause after each answer, in milliseconds
    pub feedback_delay_ms: u64,

    /// Where progress is kept, instead of the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_bank: None,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY.as_millis() as u64,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "satgame").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path, honouring the override
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let proj_dirs =
            ProjectDirs::from("", "", "satgame").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Feedback pause as a duration
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_standard_delay() {
        let config = Config::default();
        assert_eq!(config.feedback_delay(), Duration::from_millis(450));
        assert!(config.question_bank.is_none());
    }

    #[test]
    fn data_dir_override_wins() {
        let config = Config { data_dir: Some("/tmp/satgame-test".into()), ..Default::default() };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/satgame-test"));
    }

    #[test]
    fn config_serializes_without_unset_paths() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, r#"{"feedback_delay_ms":450}"#);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let json = r#"{"question_bank":"bank.json"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.question_bank, Some(PathBuf::from("bank.json")));
        assert_eq!(config.feedback_delay_ms, 450);
    }
}
