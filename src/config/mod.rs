//! Configuration management.

mod settings;
mod xdg;

pub use settings::{
    ChatSettings, QrSettings, Settings, SettingsError, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
    DEFAULT_QR_SERVICE_URL,
};
pub use xdg::XdgDirs;
