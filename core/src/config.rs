use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::service::attendance::{validate_target, DEFAULT_TARGET_PERCENTAGE};
use crate::service::schedule::{DayWindow, DEFAULT_DAY_END, DEFAULT_DAY_START, MIN_FREE_SLOT_MINUTES};

const CONFIG_FILE_NAME: &str = "config.toml";
const HOME_ENV: &str = "STUDYDASH_HOME";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_percentage: f64,
    pub day_start: String,
    pub day_end: String,
    pub min_free_slot_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_percentage: DEFAULT_TARGET_PERCENTAGE,
            day_start: DEFAULT_DAY_START.to_string(),
            day_end: DEFAULT_DAY_END.to_string(),
            min_free_slot_minutes: MIN_FREE_SLOT_MINUTES,
        }
    }
}

impl Config {
    /// Reads `config.toml` from `dir`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        validate_target(self.target_percentage)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        self.day_window()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn day_window(&self) -> Result<DayWindow, EngineError> {
        DayWindow::new(&self.day_start, &self.day_end)
    }
}

/// `$STUDYDASH_HOME`, else `~/.studydash`.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".studydash"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.day_window().unwrap(), DayWindow::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "target_percentage = 80.0\nday_end = \"18:00\"\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.target_percentage, 80.0);
        assert_eq!(config.day_start, "08:00");
        assert_eq!(config.day_end, "18:00");
        assert_eq!(config.min_free_slot_minutes, 30);

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("day_end = \"18:00\""));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "target_percentage = 120.0\n").unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<EngineError>(), Some(EngineError::Config(_))));

        fs::write(dir.path().join(CONFIG_FILE_NAME), "day_start = \"8am\"\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
