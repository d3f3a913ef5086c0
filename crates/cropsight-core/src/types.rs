// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Cropsight pipeline and channel adapters.

use serde::{Deserialize, Serialize};

/// A single crop identification returned by the vision service.
///
/// Confidence is a percentage (0-100) derived from the service's 0-1
/// probability. Ordering within [`AnalysisResult::crops`] is preserved as
/// returned by the service (assumed descending confidence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSuggestion {
    /// Common name; "Unknown" when the service omits it.
    pub name: String,
    /// Latin name; empty when the service omits it.
    #[serde(default)]
    pub scientific_name: String,
    /// Percentage confidence, rounded to two decimal places.
    pub confidence: f64,
}

/// A single disease (or health issue) identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseSuggestion {
    /// Disease name; "Unknown" when the service omits it.
    pub name: String,
    /// Percentage confidence, rounded to two decimal places.
    pub confidence: f64,
}

/// The combined outcome of one identification call.
///
/// Created once per successful call and immutable thereafter; a later
/// analysis for the same channel supersedes (never merges with) this one.
/// The verbatim service response is kept in `raw` for downstream consumers
/// that need fields not modeled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub crops: Vec<CropSuggestion>,
    pub diseases: Vec<DiseaseSuggestion>,
    /// Treatment narrative from the advisor, once enrichment has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    /// Original upload filename, when the channel supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    /// Verbatim identification-service response body.
    pub raw: serde_json::Value,
}

impl AnalysisResult {
    /// An empty result around a raw payload -- used when the service
    /// returned no `result` object (valid, not an error).
    pub fn empty(raw: serde_json::Value) -> Self {
        Self {
            crops: Vec::new(),
            diseases: Vec::new(),
            treatment: None,
            image_filename: None,
            raw,
        }
    }

    /// True when the service identified neither crops nor diseases.
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty() && self.diseases.is_empty()
    }
}

/// Derived confidence classification. Never persisted -- recompute from the
/// confidence value wherever it is displayed, so the band can't drift from
/// the number it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Classifies a 0-100 confidence: HIGH above 80, MEDIUM above 60,
    /// LOW otherwise.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 80.0 {
            ConfidenceBand::High
        } else if confidence > 60.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Upper-case label used in user-facing summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "HIGH",
            ConfidenceBand::Medium => "MEDIUM",
            ConfidenceBand::Low => "LOW",
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        // HIGH iff c > 80, MEDIUM iff 60 < c <= 80, LOW iff c <= 60.
        assert_eq!(ConfidenceBand::from_confidence(80.01), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(80.0), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(60.01), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(60.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(0.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(100.0), ConfidenceBand::High);
    }

    #[test]
    fn band_labels() {
        assert_eq!(ConfidenceBand::High.label(), "HIGH");
        assert_eq!(ConfidenceBand::Medium.to_string(), "MEDIUM");
        assert_eq!(ConfidenceBand::Low.label(), "LOW");
    }

    #[test]
    fn empty_result() {
        let result = AnalysisResult::empty(serde_json::json!({"access_token": "x"}));
        assert!(result.is_empty());
        assert!(result.treatment.is_none());
        assert_eq!(result.raw["access_token"], "x");
    }

    #[test]
    fn analysis_result_serializes_without_none_fields() {
        let result = AnalysisResult::empty(serde_json::Value::Null);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("treatment").is_none());
        assert!(json.get("image_filename").is_none());
    }

    #[test]
    fn suggestion_roundtrip() {
        let crop = CropSuggestion {
            name: "Tomato".into(),
            scientific_name: "Solanum lycopersicum".into(),
            confidence: 91.0,
        };
        let json = serde_json::to_string(&crop).unwrap();
        let back: CropSuggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(crop, back);
    }
}
