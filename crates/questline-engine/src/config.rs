//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `questline-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads the file. Hosts
//! embedding the engine without a config file fall back to
//! [`EngineConfig::default`].

use std::path::Path;

use serde::Deserialize;

use questline_types::PlayerSettings;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `questline-config.yaml`. All fields have
/// defaults matching the shipped product values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Custom quest authoring parameters.
    #[serde(default)]
    pub quests: QuestConfig,

    /// Defaults applied to newly created players.
    #[serde(default)]
    pub defaults: PlayerDefaults,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Custom quest authoring parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestConfig {
    /// Smallest allowed `requirement_value` for player-authored quests.
    #[serde(default = "default_min_requirement")]
    pub min_requirement: u32,

    /// Default XP reward granted per required task.
    #[serde(default = "default_reward_per_task")]
    pub reward_per_task: u32,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            min_requirement: default_min_requirement(),
            reward_per_task: default_reward_per_task(),
        }
    }
}

/// Defaults applied to newly created players.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerDefaults {
    /// Default minimum daily tasks.
    #[serde(default = "default_daily_min")]
    pub daily_min: u32,

    /// Default upper daily bound.
    #[serde(default = "default_daily_max")]
    pub daily_max: u32,

    /// Default monthly income goal.
    #[serde(default)]
    pub monthly_income_goal: u32,
}

impl PlayerDefaults {
    /// Materialize these defaults as a player's settings.
    pub const fn settings(&self) -> PlayerSettings {
        PlayerSettings {
            daily_min: self.daily_min,
            daily_max: self.daily_max,
            monthly_income_goal: self.monthly_income_goal,
        }
    }
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        Self {
            daily_min: default_daily_min(),
            daily_max: default_daily_max(),
            monthly_income_goal: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_min_requirement() -> u32 {
    5
}

const fn default_reward_per_task() -> u32 {
    10
}

const fn default_daily_min() -> u32 {
    3
}

const fn default_daily_max() -> u32 {
    10
}
