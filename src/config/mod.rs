use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::format::{IdKind, QUICK_AMOUNTS};

/// Application configuration stored as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// PromptPay identifier used when none is given on the command line.
    pub default_identifier: Option<String>,
    /// Kind of the default identifier.
    #[serde(default)]
    pub id_kind: IdKind,
    /// Preset amounts listed by `presets`.
    #[serde(default = "default_quick_amounts")]
    pub quick_amounts: Vec<u32>,
}

fn default_quick_amounts() -> Vec<u32> {
    QUICK_AMOUNTS.to_vec()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_identifier: None,
            id_kind: IdKind::default(),
            quick_amounts: default_quick_amounts(),
        }
    }
}

impl AppConfig {
    /// Config file path: ~/.config/promptpay/config.toml
    pub fn path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptpay");
        config_dir.join("config.toml")
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("promptpay-test-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load_from(&temp_path("missing"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.quick_amounts, QUICK_AMOUNTS.to_vec());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            default_identifier: Some("0812345678".into()),
            id_kind: IdKind::Phone,
            quick_amounts: vec![40, 80],
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str("default_identifier = \"1234567890123\"").unwrap();
        assert_eq!(config.id_kind, IdKind::Citizen);
        assert_eq!(config.quick_amounts, QUICK_AMOUNTS.to_vec());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "id_kind = 42").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
