// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote identification service.
//!
//! Sends a base64-encoded image and returns the service's raw JSON
//! response. Retry policy is deliberately absent here: only the channel
//! adapter knows whether a failure is transient (network) or permanent
//! (quota, auth), so retries live there.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cropsight_config::model::KindwiseConfig;
use cropsight_core::CropsightError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

/// Request body for the identification endpoint.
#[derive(Debug, Serialize)]
struct IdentificationRequest {
    /// Base64-encoded images (a single element in practice).
    images: Vec<String>,
    /// Ask the service for similar-image metadata.
    similar_images: bool,
}

/// HTTP client for identification-service communication.
#[derive(Debug, Clone)]
pub struct IdentificationClient {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl IdentificationClient {
    /// Creates a new identification client.
    ///
    /// Requires `config.api_key` to be set; the key is sent verbatim in the
    /// `Api-Key` header on every request.
    pub fn new(config: &KindwiseConfig) -> Result<Self, CropsightError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            CropsightError::Config("kindwise.api_key is required for identification".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(api_key)
                .map_err(|e| CropsightError::Config(format!("invalid API key header value: {e}")))?,
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
            api_url: config.api_url.clone(),
            timeout,
        })
    }

    /// Submits a normalized image for identification and returns the raw
    /// JSON response.
    ///
    /// The service signals success with either 200 or 201; both are
    /// treated identically. Any other status yields
    /// [`CropsightError::RemoteService`] carrying the parsed error body when
    /// the service sent one, else the raw response text.
    pub async fn identify(&self, image: &[u8]) -> Result<serde_json::Value, CropsightError> {
        let body = IdentificationRequest {
            images: vec![BASE64.encode(image)],
            similar_images: true,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        debug!(status = %status, "identification response received");

        let text = response.text().await.map_err(|e| CropsightError::Network {
            message: format!("failed to read identification response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.as_u16() == 200 || status.as_u16() == 201 {
            serde_json::from_str(&text).map_err(|e| {
                CropsightError::MalformedResponse(format!(
                    "identification service returned undecodable body: {e}"
                ))
            })
        } else {
            // Prefer the service's structured error body; fall back to raw text.
            let detail = match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(json) => json.to_string(),
                Err(_) => text,
            };
            Err(CropsightError::RemoteService {
                status: status.as_u16(),
                detail,
            })
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CropsightError {
        if e.is_timeout() {
            CropsightError::Timeout {
                duration: self.timeout,
            }
        } else {
            CropsightError::Network {
                message: format!("identification request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}
