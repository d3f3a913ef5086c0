// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The analysis orchestration pipeline.
//!
//! Drives one inbound request end to end:
//! RECEIVED -> NORMALIZING -> IDENTIFYING -> PARSING -> ADVISING ->
//! PERSISTED | FAILED. Identification and advisory are the only suspension
//! points; normalization, parsing, and the advice fallback are pure and
//! synchronous. On failure nothing is persisted and nothing reaches session
//! memory.

use cropsight_advisor::TreatmentAdvisor;
use cropsight_config::CropsightConfig;
use cropsight_core::{AnalysisResult, CropsightError};
use cropsight_image::ImageNormalizer;
use cropsight_kindwise::IdentificationClient;
use cropsight_store::ResultStore;
use tracing::{debug, info};

use crate::summary;

/// Phases of one analysis request, in order. Terminal phases are
/// `Persisted` and `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Received,
    Normalizing,
    Identifying,
    Parsing,
    Advising,
    Persisted,
    Failed,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnalysisPhase::Received => "received",
            AnalysisPhase::Normalizing => "normalizing",
            AnalysisPhase::Identifying => "identifying",
            AnalysisPhase::Parsing => "parsing",
            AnalysisPhase::Advising => "advising",
            AnalysisPhase::Persisted => "persisted",
            AnalysisPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Output of a conversational analysis: the result itself, the summary
/// stored in session memory, and the narrative sent back to the user.
#[derive(Debug)]
pub struct ConversationalAnalysis {
    pub result: AnalysisResult,
    pub summary: String,
    pub narrative: String,
}

/// End-to-end analysis pipeline shared by the channel adapters.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    normalizer: ImageNormalizer,
    identifier: IdentificationClient,
    advisor: TreatmentAdvisor,
    store: ResultStore,
}

impl AnalysisPipeline {
    /// Builds the pipeline from configuration.
    pub fn new(config: &CropsightConfig) -> Result<Self, CropsightError> {
        Ok(Self {
            normalizer: ImageNormalizer::new(&config.image),
            identifier: IdentificationClient::new(&config.kindwise)?,
            advisor: TreatmentAdvisor::new(&config.openrouter)?,
            store: ResultStore::new(&config.store),
        })
    }

    pub fn from_parts(
        normalizer: ImageNormalizer,
        identifier: IdentificationClient,
        advisor: TreatmentAdvisor,
        store: ResultStore,
    ) -> Self {
        Self {
            normalizer,
            identifier,
            advisor,
            store,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn advisor(&self) -> &TreatmentAdvisor {
        &self.advisor
    }

    /// Runs a diagnostic analysis (web gateway path).
    ///
    /// The treatment narrative comes from the advisor's diagnostic prompt,
    /// falling back to rules when the language model is unavailable. The
    /// result and the normalized image are persisted to the handoff slot
    /// before returning.
    pub async fn analyze(
        &self,
        raw_image: &[u8],
        filename: Option<String>,
    ) -> Result<AnalysisResult, CropsightError> {
        debug!(phase = %AnalysisPhase::Received, bytes = raw_image.len(), "analysis request");

        debug!(phase = %AnalysisPhase::Normalizing, "normalizing image");
        let normalized = self.normalizer.normalize(raw_image)?;

        debug!(phase = %AnalysisPhase::Identifying, "calling identification service");
        let raw = self.identifier.identify(&normalized.bytes).await?;

        debug!(phase = %AnalysisPhase::Parsing, "parsing identification response");
        let mut result = cropsight_kindwise::parse(raw);
        result.image_filename = filename;

        debug!(phase = %AnalysisPhase::Advising, "requesting treatment advice");
        let treatment = self.advisor.advise(&result.crops, &result.diseases).await;
        result.treatment = Some(treatment);

        self.store.persist(&result, &normalized.bytes).await?;
        info!(
            phase = %AnalysisPhase::Persisted,
            crops = result.crops.len(),
            diseases = result.diseases.len(),
            "analysis complete"
        );
        Ok(result)
    }

    /// Runs a conversational analysis (bot path): same pipeline, but the
    /// advisory prompt carries the analysis summary and the user's caption,
    /// and the summary is returned for session memory.
    pub async fn analyze_conversational(
        &self,
        raw_image: &[u8],
        caption: Option<&str>,
    ) -> Result<ConversationalAnalysis, CropsightError> {
        debug!(phase = %AnalysisPhase::Received, bytes = raw_image.len(), "photo analysis request");

        debug!(phase = %AnalysisPhase::Normalizing, "normalizing image");
        let normalized = self.normalizer.normalize(raw_image)?;

        debug!(phase = %AnalysisPhase::Identifying, "calling identification service");
        let raw = self.identifier.identify(&normalized.bytes).await?;

        debug!(phase = %AnalysisPhase::Parsing, "parsing identification response");
        let mut result = cropsight_kindwise::parse(raw);

        let summary = summary::build_summary(&result);

        debug!(phase = %AnalysisPhase::Advising, "requesting conversational advice");
        let narrative = self
            .advisor
            .advise_photo(&result.crops, &result.diseases, &summary, caption)
            .await;
        result.treatment = Some(narrative.clone());

        self.store.persist(&result, &normalized.bytes).await?;
        info!(
            phase = %AnalysisPhase::Persisted,
            crops = result.crops.len(),
            diseases = result.diseases.len(),
            "photo analysis complete"
        );

        Ok(ConversationalAnalysis {
            result,
            summary,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropsight_config::model::{ImageConfig, KindwiseConfig, OpenRouterConfig};
    use std::io::Cursor;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn png_fixture() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(32, 32));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn pipeline(
        kindwise_url: &str,
        openrouter_url: &str,
        dir: &std::path::Path,
    ) -> AnalysisPipeline {
        let kindwise = KindwiseConfig {
            api_key: Some("kw-key".into()),
            api_url: format!("{kindwise_url}/identify"),
            timeout_secs: 5,
        };
        let openrouter = OpenRouterConfig {
            api_key: Some("or-key".into()),
            base_url: openrouter_url.to_string(),
            timeout_secs: 5,
            ..OpenRouterConfig::default()
        };
        AnalysisPipeline::from_parts(
            ImageNormalizer::new(&ImageConfig::default()),
            IdentificationClient::new(&kindwise).unwrap(),
            TreatmentAdvisor::new(&openrouter).unwrap(),
            ResultStore::with_dir(dir),
        )
    }

    fn tomato_identification() -> serde_json::Value {
        serde_json::json!({
            "result": {
                "crop": {"suggestions": [
                    {"name": "Tomato", "scientific_name": "Solanum lycopersicum", "probability": 0.91}
                ]},
                "disease": {"suggestions": [
                    {"name": "Early Blight", "probability": 0.77}
                ]}
            }
        })
    }

    #[tokio::test]
    async fn end_to_end_with_advisor_forced_to_fallback() {
        let kindwise = MockServer::start().await;
        let openrouter = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/identify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tomato_identification()))
            .mount(&kindwise)
            .await;
        // Language model is down; fallback rules must produce the narrative.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&openrouter)
            .await;

        let result = pipeline(&kindwise.uri(), &openrouter.uri(), dir.path())
            .analyze(&png_fixture(), Some("leaf.jpg".into()))
            .await
            .unwrap();

        assert_eq!(result.crops.len(), 1);
        assert_eq!(result.crops[0].confidence, 91.0);
        assert_eq!(result.diseases[0].confidence, 77.0);
        let treatment = result.treatment.as_deref().unwrap();
        assert!(treatment.contains("copper-based fungicide"));
        assert!(treatment.contains("pruning of suckers"));
    }

    #[tokio::test]
    async fn analyze_persists_handoff_record() {
        let kindwise = MockServer::start().await;
        let openrouter = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/identify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tomato_identification()))
            .mount(&kindwise)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Spray weekly."}}]
            })))
            .mount(&openrouter)
            .await;

        let p = pipeline(&kindwise.uri(), &openrouter.uri(), dir.path());
        p.analyze(&png_fixture(), None).await.unwrap();

        let record = p.store().load_latest().await.unwrap().expect("handoff present");
        assert_eq!(record.crops[0].name, "Tomato");
        assert_eq!(record.treatment.as_deref(), Some("Spray weekly."));
        // The persisted image is the normalized JPEG, not the original PNG.
        let image = p.store().load_image().await.unwrap().unwrap();
        assert_eq!(
            image::guess_format(&image).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn invalid_image_fails_before_any_network_call() {
        let kindwise = MockServer::start().await;
        let openrouter = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        // Zero expected requests on either service.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&kindwise)
            .await;

        let p = pipeline(&kindwise.uri(), &openrouter.uri(), dir.path());
        let err = p.analyze(b"not an image", None).await.unwrap_err();
        assert!(matches!(err, CropsightError::InvalidImage(_)));
        assert!(p.store().load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn identification_failure_leaves_no_partial_state() {
        let kindwise = MockServer::start().await;
        let openrouter = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&kindwise)
            .await;

        let p = pipeline(&kindwise.uri(), &openrouter.uri(), dir.path());
        let err = p.analyze(&png_fixture(), None).await.unwrap_err();
        assert!(matches!(err, CropsightError::RemoteService { status: 500, .. }));
        assert!(p.store().load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conversational_analysis_returns_summary_and_narrative() {
        let kindwise = MockServer::start().await;
        let openrouter = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/identify"))
            .respond_with(ResponseTemplate::new(201).set_body_json(tomato_identification()))
            .mount(&kindwise)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "DIAGNOSIS: early blight."}}]
            })))
            .mount(&openrouter)
            .await;

        let analysis = pipeline(&kindwise.uri(), &openrouter.uri(), dir.path())
            .analyze_conversational(&png_fixture(), Some("spots appeared last week"))
            .await
            .unwrap();

        assert!(analysis.summary.contains("Tomato"));
        assert!(analysis.summary.contains("(MEDIUM risk)"));
        assert_eq!(analysis.narrative, "DIAGNOSIS: early blight.");
        assert_eq!(analysis.result.treatment.as_deref(), Some("DIAGNOSIS: early blight."));
    }
}
