// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing textual summaries of an analysis.
//!
//! Confidence bands are recomputed from the stored confidence here, never
//! persisted alongside it, so the label can't drift from the number.

use cropsight_core::{AnalysisResult, ConfidenceBand};

/// How many suggestions a summary shows per category.
const TOP_SUGGESTIONS: usize = 3;

/// Builds the conversational analysis summary stored in session memory and
/// shown to the user after a photo analysis.
pub fn build_summary(result: &AnalysisResult) -> String {
    let mut summary = String::from("CROP DISEASE ANALYSIS RESULTS\n");
    summary.push_str(&"=".repeat(40));
    summary.push_str("\n\n");

    if !result.crops.is_empty() {
        summary.push_str("IDENTIFIED CROPS:\n");
        for (i, crop) in result.crops.iter().take(TOP_SUGGESTIONS).enumerate() {
            let band = ConfidenceBand::from_confidence(crop.confidence);
            summary.push_str(&format!("{}. {}", i + 1, crop.name));
            if !crop.scientific_name.is_empty() {
                summary.push_str(&format!(" ({})", crop.scientific_name));
            }
            summary.push_str(&format!(
                " - {}% confidence ({})\n",
                crop.confidence,
                band.label()
            ));
        }
        summary.push('\n');
    }

    if !result.diseases.is_empty() {
        summary.push_str("DETECTED DISEASES/ISSUES:\n");
        for (i, disease) in result.diseases.iter().take(TOP_SUGGESTIONS).enumerate() {
            let band = ConfidenceBand::from_confidence(disease.confidence);
            summary.push_str(&format!(
                "{}. {} - {}% confidence ({} risk)\n",
                i + 1,
                disease.name,
                disease.confidence,
                band.label()
            ));
        }
        summary.push('\n');
    }

    if result.is_empty() {
        summary.push_str(
            "No clear crop or disease identification found.\n\
             Please ensure the image shows:\n\
             - Clear view of the plant/crop\n\
             - Good lighting conditions\n\
             - Focus on affected areas if disease is suspected\n\n",
        );
    }

    summary.push_str(
        "FOR DETAILED ANALYSIS:\n\
         Please provide additional information if available:\n\
         - Your location/climate zone\n\
         - Recent weather conditions\n\
         - When symptoms first appeared\n\
         - Any treatments already applied",
    );

    summary
}

/// Builds the consultation summary handed to the downstream chat process.
pub fn consultation_summary(result: &AnalysisResult) -> String {
    let mut summary = String::from("Crop Analysis Results:\n\n");

    if !result.crops.is_empty() {
        summary.push_str("Identified Crops:\n");
        for crop in &result.crops {
            summary.push_str(&format!(
                "- {} ({}): {}% confidence\n",
                crop.name, crop.scientific_name, crop.confidence
            ));
        }
    }

    if !result.diseases.is_empty() {
        summary.push_str("\nPlant Health Conditions:\n");
        for disease in &result.diseases {
            summary.push_str(&format!(
                "- {}: {}% confidence\n",
                disease.name, disease.confidence
            ));
        }
    } else if !result.crops.is_empty() {
        summary.push_str("\nNo diseases detected. The plant appears healthy.\n");
    }

    if let Some(ref treatment) = result.treatment {
        summary.push_str(&format!("\nAI Treatment Recommendations:\n{treatment}\n"));
    }

    summary
}
