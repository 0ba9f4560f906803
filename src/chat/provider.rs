//! The text-generation capability the assistant depends on.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned {status}: {details}")]
    Service { status: u16, details: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, ChatError>;
}
