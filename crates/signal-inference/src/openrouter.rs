//! OpenRouter-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use signal_core::error::InferenceError;
use signal_core::traits::SignalClient;
use signal_core::types::{SignalRequest, SignalResponse};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::prompt::build_prompt;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "google/gemma-3-1b-it:free";

/// System message sent with every request.
pub const SYSTEM_PROMPT: &str = "You are an expert financial trading assistant.";

/// Inference endpoint configuration.
#[derive(Clone)]
pub struct InferenceConfig {
    /// API base, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl InferenceConfig {
    /// Config with the default endpoint, model and sampling settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

/// Chat-completions client.
pub struct OpenRouterClient {
    config: InferenceConfig,
    client: Client,
}

impl OpenRouterClient {
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        if config.api_key.trim().is_empty() {
            return Err(InferenceError::Configuration("API key is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(InferenceError::Configuration(format!(
                "temperature {} outside [0, 2]",
                config.temperature
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn transport_error(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.config.timeout_secs)
        } else {
            InferenceError::Transport(err.without_url().to_string())
        }
    }
}

/// Extract `choices[0].message.content` from a completions envelope.
pub fn extract_content(body: &Value) -> Result<String, InferenceError> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty());

    match content {
        Some(content) => Ok(content.to_string()),
        None => {
            // OpenRouter reports some failures inside a 200 envelope.
            let detail = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("no choices[0].message.content in reply");
            Err(InferenceError::Envelope(detail.to_string()))
        }
    }
}

#[async_trait]
impl SignalClient for OpenRouterClient {
    async fn request_signal(&self, request: &SignalRequest) -> Result<SignalResponse, InferenceError> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        info!(
            symbol = request.instrument.id(),
            mode = %request.mode,
            model = %self.config.model,
            "Requesting trading signal"
        );
        debug!(prompt = %prompt, "Signal prompt");

        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(InferenceError::status(status.as_u16(), &text));
        }

        let envelope: Value = serde_json::from_str(&text)
            .map_err(|e| InferenceError::Envelope(format!("reply is not JSON: {}", e)))?;
        let content = extract_content(&envelope)?;

        let response = SignalResponse::from_content(content);
        if let Err(err) = &response.recommendation {
            warn!(symbol = request.instrument.id(), error = %err, "Reply did not contain a usable recommendation");
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_content() {
        let body = json!({
            "id": "gen-1",
            "choices": [{"message": {"role": "assistant", "content": "  {\"signal\": \"Hold\"}\n"}}]
        });
        assert_eq!(extract_content(&body).unwrap(), "{\"signal\": \"Hold\"}");
    }

    #[test]
    fn test_envelope_errors() {
        assert!(matches!(
            extract_content(&json!({"choices": []})),
            Err(InferenceError::Envelope(_))
        ));
        assert!(matches!(
            extract_content(&json!({"choices": [{"message": {"content": "   "}}]})),
            Err(InferenceError::Envelope(_))
        ));
        assert_eq!(
            extract_content(&json!({"error": {"message": "Rate limit exceeded", "code": 429}})),
            Err(InferenceError::Envelope("Rate limit exceeded".into()))
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            temperature: 0.5,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "google/gemma-3-1b-it:free");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["temperature"], 0.5);
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            OpenRouterClient::new(InferenceConfig::new("")),
            Err(InferenceError::Configuration(_))
        ));

        let mut config = InferenceConfig::new("key");
        config.temperature = 2.5;
        assert!(OpenRouterClient::new(config).is_err());

        let client = OpenRouterClient::new(InferenceConfig::new("key")).unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.completions_url(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", InferenceConfig::new("sk-or-secret"));
        assert!(!rendered.contains("sk-or-secret"));
    }
}
