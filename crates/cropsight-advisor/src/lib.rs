// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Treatment advisory for the Cropsight pipeline.
//!
//! The primary path queries a remote language model; the fallback path is a
//! deterministic rule engine over disease and crop names. The same fallback
//! runs whether the primary path timed out, was rejected, or returned
//! garbage -- an advice failure is never surfaced to the user.

pub mod client;
pub mod fallback;
pub mod prompts;

use cropsight_config::model::OpenRouterConfig;
use cropsight_core::{CropSuggestion, CropsightError, DiseaseSuggestion};
use tracing::warn;

pub use client::{ChatClient, ChatMessage};

/// Produces treatment narratives, masking language-model failures with the
/// rule-based fallback.
#[derive(Debug, Clone)]
pub struct TreatmentAdvisor {
    client: ChatClient,
}

impl TreatmentAdvisor {
    pub fn new(config: &OpenRouterConfig) -> Result<Self, CropsightError> {
        Ok(Self {
            client: ChatClient::new(config)?,
        })
    }

    /// Diagnostic treatment narrative for a fresh analysis.
    ///
    /// Infallible by design: any primary-path failure drops to
    /// [`fallback::basic_recommendations`], which depends only on the
    /// identification results.
    pub async fn advise(
        &self,
        crops: &[CropSuggestion],
        diseases: &[DiseaseSuggestion],
    ) -> String {
        let messages = [
            ChatMessage::system(prompts::CONSULTANT_SYSTEM_PROMPT),
            ChatMessage::user(prompts::treatment_prompt(crops, diseases)),
        ];

        match self
            .client
            .complete(
                &messages,
                prompts::DIAGNOSTIC_MAX_TOKENS,
                prompts::DIAGNOSTIC_TEMPERATURE,
            )
            .await
        {
            Ok(narrative) => narrative,
            Err(e) => {
                warn!(error = %e, "advisor primary path failed, using rule fallback");
                fallback::basic_recommendations(crops, diseases)
            }
        }
    }

    /// Conversational narrative for a photo analysis in the bot, threading
    /// the analysis summary and the user's caption into the prompt.
    ///
    /// Falls back the same way as [`advise`](Self::advise).
    pub async fn advise_photo(
        &self,
        crops: &[CropSuggestion],
        diseases: &[DiseaseSuggestion],
        summary: &str,
        caption: Option<&str>,
    ) -> String {
        let messages = [
            ChatMessage::system(prompts::SPECIALIST_SYSTEM_PROMPT),
            ChatMessage::user(prompts::photo_analysis_prompt(summary, caption)),
        ];

        match self
            .client
            .complete(&messages, prompts::CHAT_MAX_TOKENS, prompts::CHAT_TEMPERATURE)
            .await
        {
            Ok(narrative) => narrative,
            Err(e) => {
                warn!(error = %e, "conversational advisory failed, using rule fallback");
                fallback::basic_recommendations(crops, diseases)
            }
        }
    }

    /// Answers a free-text question using the last analysis summary as
    /// context. There is no rule fallback for open-ended questions, so
    /// failures surface to the adapter for a user-facing message.
    pub async fn answer_followup(
        &self,
        last_summary: &str,
        question: &str,
    ) -> Result<String, CropsightError> {
        let messages = [
            ChatMessage::system(prompts::SPECIALIST_SYSTEM_PROMPT),
            ChatMessage::user(prompts::followup_prompt(last_summary, question)),
        ];
        self.client
            .complete(&messages, prompts::CHAT_MAX_TOKENS, prompts::CHAT_TEMPERATURE)
            .await
    }

    /// Answers a standalone free-text question with no prior analysis.
    pub async fn answer_standalone(&self, question: &str) -> Result<String, CropsightError> {
        let messages = [
            ChatMessage::system(prompts::SPECIALIST_SYSTEM_PROMPT),
            ChatMessage::user(prompts::standalone_prompt(question)),
        ];
        self.client
            .complete(&messages, prompts::CHAT_MAX_TOKENS, prompts::CHAT_TEMPERATURE)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn advisor(base_url: &str) -> TreatmentAdvisor {
        let config = OpenRouterConfig {
            api_key: Some("test-key".into()),
            base_url: base_url.to_string(),
            timeout_secs: 2,
            ..OpenRouterConfig::default()
        };
        TreatmentAdvisor::new(&config).unwrap()
    }

    fn tomato() -> CropSuggestion {
        CropSuggestion {
            name: "Tomato".into(),
            scientific_name: "Solanum lycopersicum".into(),
            confidence: 91.0,
        }
    }

    fn blight() -> DiseaseSuggestion {
        DiseaseSuggestion {
            name: "Early Blight".into(),
            confidence: 77.0,
        }
    }

    #[tokio::test]
    async fn advise_uses_primary_path_when_available() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Model narrative."}}]
            })))
            .mount(&server)
            .await;

        let narrative = advisor(&server.uri()).advise(&[tomato()], &[blight()]).await;
        assert_eq!(narrative, "Model narrative.");
    }

    #[tokio::test]
    async fn advise_falls_back_on_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let narrative = advisor(&server.uri()).advise(&[tomato()], &[blight()]).await;
        // Rule fallback: blight remediation plus tomato tips.
        assert!(narrative.contains("copper-based fungicide"));
        assert!(narrative.contains("pruning of suckers"));
    }

    #[tokio::test]
    async fn advise_empty_analysis_yields_healthy_fallback_deterministically() {
        // No mock mounted: every request fails at the HTTP layer.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let a = advisor(&server.uri());
        let first = a.advise(&[], &[]).await;
        let second = a.advise(&[], &[]).await;
        assert_eq!(first, second);
        assert!(first.contains("Plant Health Status: HEALTHY"));
    }

    #[tokio::test]
    async fn advise_photo_sends_chat_sampling_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"max_tokens": 600, "temperature": 0.3}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        advisor(&server.uri())
            .advise_photo(&[tomato()], &[], "SUMMARY", Some("caption"))
            .await;
    }

    #[tokio::test]
    async fn followup_failure_is_surfaced_not_masked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let result = advisor(&server.uri())
            .answer_followup("summary", "question")
            .await;
        assert!(matches!(
            result,
            Err(CropsightError::RemoteService { status: 401, .. })
        ));
    }
}
