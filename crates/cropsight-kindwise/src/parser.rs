// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant parsing of the identification service's nested response.
//!
//! The service's shape is partially optional at every level: the top-level
//! `result` may be absent or null, each of `crop`/`disease` may lack a
//! `suggestions` list, and each suggestion may omit `name`,
//! `scientific_name`, or `probability`. None of these are errors. Missing
//! optional fields get documented defaults: name "Unknown", scientific name
//! empty, probability 0. Losing a default here silently changes
//! confidence-band outcomes downstream, so each is pinned by a test.

use cropsight_core::{AnalysisResult, CropSuggestion, DiseaseSuggestion};

/// Converts a 0-1 probability to a 0-100 confidence, rounded to two
/// decimal places.
fn confidence_from_probability(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

/// Extracts a uniform [`AnalysisResult`] from the service's raw response.
///
/// Never fails: an undecodable payload is rejected earlier by the client,
/// and every optional field below the top level has a default. An absent
/// disease section means "no disease detected" -- a valid, common outcome,
/// represented as an empty vector rather than an error.
pub fn parse(raw: serde_json::Value) -> AnalysisResult {
    let mut crops = Vec::new();
    let mut diseases = Vec::new();

    if let Some(result) = raw.get("result").filter(|r| !r.is_null()) {
        if let Some(suggestions) = result
            .get("crop")
            .and_then(|c| c.get("suggestions"))
            .and_then(|s| s.as_array())
        {
            for suggestion in suggestions {
                crops.push(CropSuggestion {
                    name: string_or(suggestion, "name", "Unknown"),
                    scientific_name: string_or(suggestion, "scientific_name", ""),
                    confidence: confidence_from_probability(
                        suggestion
                            .get("probability")
                            .and_then(|p| p.as_f64())
                            .unwrap_or(0.0),
                    ),
                });
            }
        }

        if let Some(suggestions) = result
            .get("disease")
            .and_then(|d| d.get("suggestions"))
            .and_then(|s| s.as_array())
        {
            for suggestion in suggestions {
                diseases.push(DiseaseSuggestion {
                    name: string_or(suggestion, "name", "Unknown"),
                    confidence: confidence_from_probability(
                        suggestion
                            .get("probability")
                            .and_then(|p| p.as_f64())
                            .unwrap_or(0.0),
                    ),
                });
            }
        }
    }

    AnalysisResult {
        crops,
        diseases,
        treatment: None,
        image_filename: None,
        raw,
    }
}

fn string_or(value: &serde_json::Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}
