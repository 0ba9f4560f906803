//! Study assistant transcript.

use std::sync::Arc;

use super::provider::TextGenerator;
use crate::messaging::{ChatSpeaker, Message};

pub const SYSTEM_INSTRUCTION: &str = "You are ToolNest Student Assistant. Help students with PDF merging, class schedules, and calculators.";

/// Shown when the service answers with no text.
pub const EMPTY_REPLY: &str = "I'm here to help!";

/// Shown when the request fails for any reason.
pub const FALLBACK_REPLY: &str = "AI is busy, but your tools are ready!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn to_message(&self) -> Message {
        let speaker = match self.role {
            ChatRole::User => ChatSpeaker::User,
            ChatRole::Model => ChatSpeaker::Assistant,
        };
        Message::chat(speaker, self.text.clone())
    }
}

/// Single-turn assistant: each prompt is sent on its own, without the transcript.
pub struct ChatAssistant {
    generator: Arc<dyn TextGenerator>,
    messages: Vec<ChatMessage>,
    typing: bool,
}

impl ChatAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            messages: Vec::new(),
            typing: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a reply is pending.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Send `input` and append the reply. Blank input is ignored and returns `None`.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: input.to_string(),
        });
        self.typing = true;

        let reply = match self.generator.generate(input, SYSTEM_INSTRUCTION).await {
            Ok(text) if text.is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(provider = self.generator.name(), error = %e, "Chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply,
        });
        self.typing = false;
        self.messages.last()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.messages.iter().map(ChatMessage::to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed result and records every prompt.
    struct ScriptedGenerator {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Result<&str, ()>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str, system: &str) -> Result<String, ChatError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            self.reply.clone().map_err(|_| ChatError::MissingApiKey)
        }
    }

    #[tokio::test]
    async fn test_reply_is_appended() {
        let generator = ScriptedGenerator::new(Ok("Try the Merge PDF tool."));
        let mut assistant = ChatAssistant::new(generator.clone());

        let reply = assistant.send("How do I merge PDFs?").await.unwrap();
        assert_eq!(reply.text, "Try the Merge PDF tool.");
        assert_eq!(
            assistant.messages().iter().map(|m| m.role).collect::<Vec<_>>(),
            vec![ChatRole::User, ChatRole::Model]
        );
        assert!(!assistant.is_typing());

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts[0].0, "How do I merge PDFs?");
        assert_eq!(prompts[0].1, SYSTEM_INSTRUCTION);
    }

    #[tokio::test]
    async fn test_failure_appends_fallback_once() {
        let mut assistant = ChatAssistant::new(ScriptedGenerator::new(Err(())));
        assistant.send("hello").await;

        let replies: Vec<&str> = assistant
            .messages()
            .iter()
            .filter(|m| m.role == ChatRole::Model)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(replies, vec![FALLBACK_REPLY]);
        assert!(!assistant.is_typing());
    }

    #[tokio::test]
    async fn test_empty_reply_uses_default() {
        let mut assistant = ChatAssistant::new(ScriptedGenerator::new(Ok("")));
        let reply = assistant.send("anything").await.unwrap();
        assert_eq!(reply.text, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let generator = ScriptedGenerator::new(Ok("unused"));
        let mut assistant = ChatAssistant::new(generator.clone());
        assert!(assistant.send("   ").await.is_none());
        assert!(assistant.messages().is_empty());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_is_not_resent() {
        let generator = ScriptedGenerator::new(Ok("ok"));
        let mut assistant = ChatAssistant::new(generator.clone());
        assistant.send("first").await;
        assistant.send("second").await;

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts[1].0, "second");
        assert_eq!(assistant.transcript().len(), 4);
    }
}
