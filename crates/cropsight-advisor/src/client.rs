// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenRouter-compatible chat-completions API.
//!
//! One request, one completion. No retry here -- the caller decides whether
//! a failure is worth retrying or should drop to the rule fallback.

use std::time::Duration;

use cropsight_config::model::OpenRouterConfig;
use cropsight_core::CropsightError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single message in the chat-completion conversation format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

/// Response body (only the fields we consume).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// HTTP client for language-model completions.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    completions_url: String,
    model: String,
    timeout: Duration,
}

impl ChatClient {
    /// Creates a new chat client.
    ///
    /// Requires `config.api_key`; the attribution headers (`HTTP-Referer`,
    /// `X-Title`) are sent on every request as OpenRouter recommends.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, CropsightError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            CropsightError::Config("openrouter.api_key is required for the advisor".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| CropsightError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(&config.referer)
                .map_err(|e| CropsightError::Config(format!("invalid referer header value: {e}")))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(&config.title)
                .map_err(|e| CropsightError::Config(format!("invalid title header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CropsightError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            timeout,
        })
    }

    /// Requests one completion and returns its trimmed text.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CropsightError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&self.completions_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "completion response received");

        let text = response.text().await.map_err(|e| CropsightError::Network {
            message: format!("failed to read completion response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(json) => json.to_string(),
                Err(_) => text,
            };
            return Err(CropsightError::RemoteService {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            CropsightError::MalformedResponse(format!(
                "language model returned undecodable body: {e}"
            ))
        })?;

        let completion = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| {
                CropsightError::MalformedResponse(
                    "language model returned no completion choices".into(),
                )
            })?;

        Ok(completion)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CropsightError {
        if e.is_timeout() {
            CropsightError::Timeout {
                duration: self.timeout,
            }
        } else {
            CropsightError::Network {
                message: format!("completion request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}
