//! Study assistant chat.
//!
//! The assistant talks to a [`TextGenerator`]; [`GeminiClient`] is the
//! production implementation.

mod assistant;
mod gemini;
mod provider;

pub use assistant::{
    ChatAssistant, ChatMessage, ChatRole, EMPTY_REPLY, FALLBACK_REPLY, SYSTEM_INSTRUCTION,
};
pub use gemini::GeminiClient;
pub use provider::{ChatError, TextGenerator};
