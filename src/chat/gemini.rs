//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{ChatError, TextGenerator};
use crate::config::ChatSettings;

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            client: HttpClient::new(),
        }
    }

    pub fn from_settings(settings: &ChatSettings) -> Self {
        Self::new(
            settings.api_key.clone().unwrap_or_default(),
            &settings.model,
            &settings.base_url,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

fn build_request(prompt: &str, system_instruction: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        system_instruction: GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: system_instruction.to_string(),
            }],
        },
    }
}

/// Text of the first candidate; empty when there is none.
fn response_text(response: GeminiResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let request = build_request(prompt, system_instruction);
        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Gemini request failed");
            return Err(ChatError::Service {
                status: status.as_u16(),
                details: body,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        Ok(response_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};

    #[test]
    fn test_request_shape() {
        let request = build_request("Merge my PDFs?", "Be brief.");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Merge my PDFs?"}]}],
                "systemInstruction": {"parts": [{"text": "Be brief."}]}
            })
        );
    }

    #[test]
    fn test_response_text() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Use "},{"text":"Merge PDF."}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response_text(parsed), "Use Merge PDF.");
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response_text(parsed), "");
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("k3y", DEFAULT_CHAT_MODEL, format!("{}/", DEFAULT_CHAT_BASE_URL));
        assert_eq!(
            client.endpoint(),
            format!(
                "{}/models/{}:generateContent?key=k3y",
                DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL
            )
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new("", DEFAULT_CHAT_MODEL, "http://127.0.0.1:9");
        let err = client.generate("hi", "sys").await.unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }
}
