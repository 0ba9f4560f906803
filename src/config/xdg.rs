//! XDG Base Directory support.

use std::path::{Path, PathBuf};

/// Application directory name under the XDG base directories.
const APP_DIR: &str = "toolnest";

/// XDG directory paths for ToolNest.
///
/// Only configuration is read from disk; nothing the tools produce is kept
/// between runs, so there is no data or state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    /// Config directory (~/.config/toolnest or XDG_CONFIG_HOME/toolnest)
    pub config: PathBuf,
}

impl XdgDirs {
    /// Get XDG directories, respecting environment variables.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::resolve(&home, |key| std::env::var(key).ok())
    }

    /// Resolve directories against `home`, reading overrides through `lookup`.
    pub fn resolve(home: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config_home = lookup("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".config"));

        Self {
            config: config_home.join(APP_DIR),
        }
    }

    /// Path of the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config.join("settings.json")
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
