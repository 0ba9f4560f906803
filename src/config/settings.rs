//! Settings loaded from `settings.json` with environment overrides.
//!
//! Settings are read once at startup and never written back.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::XdgDirs;

/// Default model for the study assistant.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

/// Default generative language API root.
pub const DEFAULT_CHAT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default QR rendering service.
pub const DEFAULT_QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Study assistant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
        }
    }
}

/// QR code service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub service_url: String,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_QR_SERVICE_URL.to_string(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chat: ChatSettings,
    pub qr: QrSettings,
    /// Where downloads are written. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
    /// Start in dark mode.
    pub dark_mode: bool,
}

impl Settings {
    /// Load from the default location, applying environment overrides.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let path = XdgDirs::new().settings_file();
        let mut settings = Self::load_from_path(&path)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load from a specific file. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `GEMINI_API_KEY` takes precedence over `API_KEY`;
    /// `TOOLNEST_OUTPUT_DIR` overrides the output directory.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.is_empty())
            .or_else(|| lookup("API_KEY").filter(|v| !v.is_empty()));
        if key.is_some() {
            self.chat.api_key = key;
        }

        if let Some(dir) = lookup("TOOLNEST_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = Some(PathBuf::from(shellexpand::tilde(&dir).as_ref()));
        }
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =========================================================================
    // Loading Tests
    // =========================================================================

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from_path(&temp.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.chat.model, DEFAULT_CHAT_MODEL);
        assert_eq!(settings.qr.service_url, DEFAULT_QR_SERVICE_URL);
        assert_eq!(settings.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "chat": { "model": "gemini-2.5-pro" }, "dark_mode": true }"#).unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.chat.model, "gemini-2.5-pro");
        assert_eq!(settings.chat.base_url, DEFAULT_CHAT_BASE_URL);
        assert!(settings.chat.api_key.is_none());
        assert!(settings.dark_mode);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    // =========================================================================
    // Environment Override Tests
    // =========================================================================

    #[test]
    fn test_gemini_key_wins_over_api_key() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            "API_KEY" => Some("generic".to_string()),
            _ => None,
        });
        assert_eq!(settings.chat.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_api_key_fallback() {
        let mut settings = Settings::default();
        settings.apply_env(|key| (key == "API_KEY").then(|| "generic".to_string()));
        assert_eq!(settings.chat.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn test_empty_env_does_not_clear_file_key() {
        let mut settings = Settings::default();
        settings.chat.api_key = Some("from-file".to_string());
        settings.apply_env(|_| Some(String::new()));
        assert_eq!(settings.chat.api_key.as_deref(), Some("from-file"));
        assert!(settings.output_dir.is_none());
    }

    #[test]
    fn test_output_dir_override() {
        let mut settings = Settings::default();
        settings.apply_env(|key| (key == "TOOLNEST_OUTPUT_DIR").then(|| "/tmp/out".to_string()));
        assert_eq!(settings.output_dir(), PathBuf::from("/tmp/out"));
    }
}
