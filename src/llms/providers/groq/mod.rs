//! Groq chat-completions provider.
//!
//! Talks to Groq's OpenAI-compatible `/chat/completions` endpoint over
//! `reqwest` with bearer auth, a per-request timeout and a bounded retry
//! loop. Transport errors, 429 and 5xx are retried; any other 4xx fails
//! immediately.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{LLMMessage, TextGenerator};
use crate::utilities::config::DialogosConfig;
use crate::utilities::errors::GenerationError;

/// Reply used when the model returns an empty completion.
pub const EMPTY_COMPLETION_FALLBACK: &str = "Lo siento, no pude generar una respuesta.";

/// Groq completion client.
#[derive(Debug, Clone)]
pub struct GroqCompletion {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry.
    pub retry_delay: Duration,
}

impl GroqCompletion {
    /// Create a client with a 30 second timeout and one retry.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        Self::with_timeout(api_key, base_url, model, Duration::from_secs(30))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 1.0,
            max_tokens: 500,
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &DialogosConfig) -> Result<Self, GenerationError> {
        let mut provider = Self::with_timeout(
            config.groq_api_key.clone(),
            config.groq_base_url.clone(),
            config.groq_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        provider.temperature = config.temperature;
        provider.max_tokens = config.max_tokens;
        provider.max_retries = config.max_retries;
        Ok(provider)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body for the chat-completions API.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Extract `choices[0].message.content`.
    ///
    /// A missing or blank content string yields [`EMPTY_COMPLETION_FALLBACK`].
    pub fn parse_completion(response: &Value) -> Result<String, GenerationError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".into()))?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "Groq token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .map(str::trim)
            .unwrap_or("");

        if content.is_empty() {
            Ok(EMPTY_COMPLETION_FALLBACK.to_string())
        } else {
            Ok(content.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for GroqCompletion {
    async fn generate(&self, messages: &[LLMMessage]) -> Result<String, GenerationError> {
        log::debug!(
            "GroqCompletion.generate: model={}, messages={}",
            self.model,
            messages.len()
        );

        let body = self.build_request_body(messages);
        let endpoint = self.endpoint();

        let mut last_error = String::from("no attempt made");
        let mut retry_delay = self.retry_delay;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!("Groq API retry attempt {} after {:?}", attempt, retry_delay);
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_error = "rate limited by Groq API (429)".to_string();
                continue;
            }

            if status.is_server_error() {
                last_error = format!("Groq API server error: {status}");
                continue;
            }

            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            if !status.is_success() {
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    body: response_text,
                });
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
                let preview: String = response_text.chars().take(500).collect();
                GenerationError::MalformedResponse(format!("{e} - Body: {preview}"))
            })?;

            return Self::parse_completion(&response_json);
        }

        Err(GenerationError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last: last_error,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GroqCompletion {
        GroqCompletion::new("test-key", "https://api.groq.com/openai/v1/", "llama-test").unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(
            provider().endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body() {
        let mut groq = provider();
        groq.temperature = 0.7;
        groq.max_tokens = 200;
        let body = groq.build_request_body(&[
            LLMMessage::system("Eres Leo"),
            LLMMessage::user("Hola"),
        ]);
        assert_eq!(body["model"], "llama-test");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hola");
    }

    #[test]
    fn test_parse_completion() {
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  Aquí estoy.  "}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        });
        assert_eq!(GroqCompletion::parse_completion(&response).unwrap(), "Aquí estoy.");
    }

    #[test]
    fn test_parse_empty_completion_uses_fallback() {
        let response = serde_json::json!({"choices": [{"message": {"content": ""}}]});
        assert_eq!(
            GroqCompletion::parse_completion(&response).unwrap(),
            EMPTY_COMPLETION_FALLBACK
        );
        let response = serde_json::json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(
            GroqCompletion::parse_completion(&response).unwrap(),
            EMPTY_COMPLETION_FALLBACK
        );
    }

    #[test]
    fn test_parse_without_choices_is_malformed() {
        let response = serde_json::json!({"error": "boom"});
        assert!(matches!(
            GroqCompletion::parse_completion(&response),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_retries() {
        let mut groq = GroqCompletion::with_timeout(
            "k",
            "http://127.0.0.1:9",
            "m",
            Duration::from_millis(200),
        )
        .unwrap();
        groq.max_retries = 1;
        groq.retry_delay = Duration::from_millis(1);
        let err = groq.generate(&[LLMMessage::user("hola")]).await.unwrap_err();
        assert!(matches!(err, GenerationError::RetriesExhausted { attempts: 2, .. }));
    }
}
