//! Configuration settings for Trall.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub catalog: CatalogSettings,
    pub upload: UploadSettings,
    pub session: SessionSettings,
    pub playback: PlaybackSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Catalog directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding the playable audio files.
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: "~/Music/trall".to_string(),
        }
    }
}

/// Upload pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Whether uploads are allowed at all.
    pub enabled: bool,
    /// Uploader identities allowed to upload. Empty means everyone.
    pub allow_list: Vec<String>,
    /// Maximum advertised size in bytes. None means unlimited.
    pub max_bytes: Option<u64>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_list: Vec::new(),
            max_bytes: None,
        }
    }
}

/// Selection session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long to wait for a reply before giving up silently.
    pub reply_timeout_secs: u64,
    /// Reserved keyword that cancels a selection.
    pub cancel_keyword: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reply_timeout_secs: 30,
            cancel_keyword: "cancel".to_string(),
        }
    }
}

/// Narrowband playback pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Target sample rate for the resample step.
    pub sample_rate: u32,
    /// Target channel count for the resample step.
    pub channels: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            channels: 1,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TrallError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trall")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded catalog directory path.
    pub fn catalog_dir(&self) -> PathBuf {
        Self::expand_path(&self.catalog.path)
    }

    /// Reply timeout as a Duration.
    pub fn reply_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session.reply_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe() {
        let settings = Settings::default();
        assert!(!settings.upload.enabled);
        assert!(settings.upload.allow_list.is_empty());
        assert_eq!(settings.session.reply_timeout_secs, 30);
        assert_eq!(settings.session.cancel_keyword, "cancel");
        assert_eq!(settings.playback.sample_rate, 8000);
        assert_eq!(settings.playback.channels, 1);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [catalog]
            path = "/srv/audio"

            [upload]
            enabled = true
            allow_list = ["alice"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.catalog.path, "/srv/audio");
        assert!(settings.upload.enabled);
        assert_eq!(settings.upload.allow_list, vec!["alice".to_string()]);
        assert!(settings.upload.max_bytes.is_none());
        assert_eq!(settings.session.reply_timeout_secs, 30);
    }
}
