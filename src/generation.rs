//! Generation service client.
//!
//! Defines the [`GenerationService`] trait (prompt in, text out) and
//! [`OpenRouterClient`], which calls an OpenAI-compatible
//! `POST {base_url}/chat/completions` endpoint.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately with [`GenerationError::Rejected`]
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Every failure reaches the caller as a [`GenerationError`]; nothing is
//! turned into answer text.

use std::time::Duration;

use thiserror::Error;

use crate::config::GenerationConfig;

/// Prompt used by [`OpenRouterClient::verify_key`].
const HANDSHAKE_PROMPT: &str = "test";

#[derive(Debug, Error)]
pub enum GenerationError {
    /// No key in the configured environment variable or on the command line.
    #[error("API key not provided: set {0} or pass --api-key")]
    MissingApiKey(String),

    /// Non-retryable client error, e.g. 401 for a malformed or revoked key.
    #[error("generation service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Network failure or server error that persisted through all retries.
    #[error("generation service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response from generation service: {0}")]
    MalformedResponse(String),
}

/// Synchronous text generation.
pub trait GenerationService: Send + Sync {
    /// Model identifier, for display.
    fn model_name(&self) -> &str;

    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Chat-completions client for OpenRouter and other OpenAI-compatible APIs.
pub struct OpenRouterClient {
    config: GenerationConfig,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl OpenRouterClient {
    /// Build a client. `api_key` overrides the environment variable named
    /// by `config.api_key_env`.
    pub fn new(
        config: &GenerationConfig,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(config.api_key_env.clone()))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        Ok(Self {
            config: config.clone(),
            api_key,
            http,
        })
    }

    /// Check the key with a one-token completion.
    pub fn verify_key(&self) -> Result<(), GenerationError> {
        self.post_chat(HANDSHAKE_PROMPT, 1).map(|_| ())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn post_chat(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<serde_json::Value, GenerationError> {
        let body = request_body(&self.config, prompt, max_tokens);
        let url = self.endpoint();

        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                std::thread::sleep(delay);
            }

            let resp = self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send();

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response
                            .json::<serde_json::Value>()
                            .map_err(|e| GenerationError::MalformedResponse(e.to_string()));
                    }

                    let body_text = response.text().unwrap_or_default();

                    // Rate limited or server error: retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(GenerationError::Unavailable(format!(
                            "{}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    return Err(GenerationError::Rejected {
                        status: status.as_u16(),
                        body: body_text,
                    });
                }
                Err(e) => {
                    last_err = Some(GenerationError::Unavailable(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| GenerationError::Unavailable("request failed after retries".into())))
    }
}

impl GenerationService for OpenRouterClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let json = self.post_chat(prompt, self.config.max_tokens)?;
        parse_completion(&json)
    }
}

/// JSON body for a single-message, non-streaming chat completion.
fn request_body(config: &GenerationConfig, prompt: &str, max_tokens: u32) -> serde_json::Value {
    serde_json::json!({
        "model": config.model,
        "messages": [
            { "role": "user", "content": prompt }
        ],
        "temperature": config.temperature,
        "max_tokens": max_tokens,
        "stream": false,
    })
}

/// Extract `choices[0].message.content`.
fn parse_completion(json: &serde_json::Value) -> Result<String, GenerationError> {
    if let Some(err) = json.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(GenerationError::Unavailable(message));
    }

    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
