//! OpenAI implementation of the [`Inference`] trait.
//!
//! Calls the chat completions API in JSON-object mode at low temperature.
//! The API key is held behind `secrecy` so it never shows up in logs or
//! debug output.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::Inference;
use crate::error::{ExtractionError, Result};
use crate::prompts::InferenceRequest;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-backed inference client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    ///
    /// A missing key is a configuration error: the pipeline cannot run
    /// without inference credentials.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ExtractionError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Parse model output as a top-level JSON object.
///
/// Some models wrap JSON in markdown fences despite instructions; strip
/// those before parsing. A non-object top level is rejected.
pub fn parse_json_object(raw: &str) -> Result<Value> {
    let json_str = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value =
        serde_json::from_str(json_str).map_err(|e| ExtractionError::MalformedInference {
            reason: e.to_string(),
        })?;

    if !value.is_object() {
        return Err(ExtractionError::MalformedInference {
            reason: "top-level value is not a JSON object".to_string(),
        });
    }
    Ok(value)
}

#[async_trait]
impl Inference for OpenAiClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<Value> {
        debug!(
            model = %self.model,
            prompt_len = request.user.len(),
            "inference call starting"
        );

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Inference(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Inference(
                format!("OpenAI API error {status}: {error_text}").into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Inference(Box::new(e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExtractionError::Inference("no completion returned".into()))?;

        parse_json_object(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_object() {
        let value = parse_json_object(r#"{"title": "Beca"}"#).unwrap();
        assert_eq!(value["title"], "Beca");
    }

    #[test]
    fn test_parse_json_object_strips_fences() {
        let value = parse_json_object("```json\n{\"title\": \"Beca\"}\n```").unwrap();
        assert_eq!(value["title"], "Beca");
    }

    #[test]
    fn test_parse_json_object_rejects_non_object() {
        assert!(parse_json_object(r#"["a", "b"]"#).is_err());
        assert!(parse_json_object("not json at all").is_err());
    }

    #[test]
    fn test_api_key_not_in_debug() {
        let client = OpenAiClient::new("sk-super-secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
