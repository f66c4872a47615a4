//! Configuration file support for meetbook.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/meetbook/config.toml`.
//! Every section and field is optional.

use crate::heats::TieBreak;
use crate::program::DEFAULT_STYLE_PRIORITY;
use crate::types::{Remark, Style};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub program: ProgramConfig,

    #[serde(default)]
    pub heats: HeatConfig,

    #[serde(default)]
    pub results: ResultsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Directory holding one saved program order per event
    pub fn order_dir(&self) -> PathBuf {
        self.data_dir.join("program_order")
    }
}

/// Program ordering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramConfig {
    #[serde(default = "default_style_priority")]
    pub style_priority: Vec<Style>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            style_priority: default_style_priority(),
        }
    }
}

/// Heat seeding configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HeatConfig {
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Fixes the random tie-break for reproducible heat sheets
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Results configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Remarks that keep an entry out of the ranking and off the podium
    #[serde(default = "default_excluded_remarks")]
    pub excluded_remarks: Vec<Remark>,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            excluded_remarks: default_excluded_remarks(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("meetbook")
}

fn default_style_priority() -> Vec<Style> {
    DEFAULT_STYLE_PRIORITY.to_vec()
}

fn default_excluded_remarks() -> Vec<Remark> {
    Remark::ALL.to_vec()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
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

    /// Reject configurations the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        let priority = &self.program.style_priority;
        for (i, style) in priority.iter().enumerate() {
            if priority[..i].contains(style) {
                return Err(Error::Config(format!(
                    "style '{}' listed twice in program.style_priority",
                    style
                )));
            }
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("meetbook").join("config.toml")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.program.style_priority.len(), 5);
        assert_eq!(config.program.style_priority[0], Style::Freestyle);
        assert_eq!(config.heats.tie_break, TieBreak::Random);
        assert_eq!(config.heats.seed, None);
        assert_eq!(config.results.excluded_remarks.len(), 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.heats.tie_break = TieBreak::SwimmerName;
        config.results.excluded_remarks = vec![Remark::Dq, Remark::Dns];
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.heats.tie_break, TieBreak::SwimmerName);
        assert_eq!(parsed.results.excluded_remarks, vec![Remark::Dq, Remark::Dns]);
        assert_eq!(parsed.program.style_priority, config.program.style_priority);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[program]
style_priority = ["Butterfly", "free"]

[heats]
tie_break = "swimmer_id"
seed = 99
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.program.style_priority,
            vec![Style::Butterfly, Style::Freestyle]
        );
        assert_eq!(config.heats.tie_break, TieBreak::SwimmerId);
        assert_eq!(config.heats.seed, Some(99));
        assert_eq!(config.results.excluded_remarks.len(), 4); // default
    }

    #[test]
    fn test_duplicate_style_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[program]\nstyle_priority = [\"Freestyle\", \"free\"]\n",
        )
        .unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
