//! Configuration file support for breathe.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/breathe/config.toml`.

use crate::{Category, Error, ExerciseDefinition, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub ticker: TickerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub exercises: ExercisesConfig,
}

/// Bounds of the breathing circle
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    #[serde(default = "default_max_size")]
    pub max_size: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
        }
    }
}

/// Tick source configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Session defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_exercise")]
    pub default_exercise: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_exercise: default_exercise(),
        }
    }
}

/// User-defined exercise, validated when merged into the catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomExercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    // Signed; range is checked per entry in `to_definition`
    pub inhale: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold1: Option<i64>,
    pub exhale: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold2: Option<i64>,
    #[serde(default = "default_recommended_minutes")]
    pub recommended_minutes: u32,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl CustomExercise {
    pub fn to_definition(&self) -> Result<ExerciseDefinition> {
        let inhale = self.seconds("inhale", self.inhale)?;
        let hold1 = self.hold1.map(|v| self.seconds("hold1", v)).transpose()?;
        let exhale = self.seconds("exhale", self.exhale)?;
        let hold2 = self.hold2.map(|v| self.seconds("hold2", v)).transpose()?;

        ExerciseDefinition::new(
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            self.category,
            (inhale, hold1, exhale, hold2),
            self.recommended_minutes,
            self.benefits.clone(),
        )
    }

    fn seconds(&self, field: &str, value: i64) -> Result<u32> {
        u32::try_from(value).map_err(|_| Error::InvalidDefinition {
            id: self.id.clone(),
            reason: format!("{} must be a non-negative number of seconds, got {}", field, value),
        })
    }
}

/// Custom exercises configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExercisesConfig {
    #[serde(default)]
    pub custom: Vec<CustomExercise>,
}

// Default value functions
fn default_min_size() -> f64 {
    100.0
}

fn default_max_size() -> f64 {
    280.0
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_exercise() -> String {
    "box".into()
}

fn default_recommended_minutes() -> u32 {
    5
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.ticker.interval_ms == 0 {
            return Err(Error::Config("ticker.interval_ms must be positive".into()));
        }
        if !(self.display.min_size.is_finite() && self.display.max_size.is_finite()) {
            return Err(Error::Config("display sizes must be finite".into()));
        }
        if self.display.min_size < 0.0 || self.display.min_size >= self.display.max_size {
            return Err(Error::Config(format!(
                "display.min_size ({}) must be non-negative and below display.max_size ({})",
                self.display.min_size, self.display.max_size
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".config")
        });
        base.join("breathe").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
