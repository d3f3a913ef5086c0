// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic rule-based treatment recommendations.
//!
//! Used whenever the language-model path fails -- timeout, auth, rate
//! limit, malformed response -- or was never attempted. Derivable purely
//! from `(crops, diseases)` with no network access, so repeated calls with
//! the same input always produce the same narrative.

use cropsight_core::{CropSuggestion, DiseaseSuggestion};

/// Disease-name categories matched by case-insensitive substring, in fixed
/// order. First match wins.
const DISEASE_RULES: &[(&[&str], &str)] = &[
    (
        &["blight", "spot"],
        "Remove affected leaves, improve air circulation, consider copper-based fungicide.",
    ),
    (
        &["rust"],
        "Remove infected parts, avoid overhead watering, apply fungicide if severe.",
    ),
    (
        &["mildew"],
        "Increase air circulation, reduce humidity, consider organic fungicide treatment.",
    ),
    (
        &["rot"],
        "Improve drainage, reduce watering, remove affected parts immediately.",
    ),
    (
        &["wilt"],
        "Check soil drainage, adjust watering schedule, may need soil treatment.",
    ),
];

const UNMATCHED_DISEASE_ADVICE: &str =
    "Monitor closely, maintain good plant hygiene, consult agricultural expert.";

const GENERAL_DISEASE_MANAGEMENT: &str = "\
General Disease Management:
- Remove and dispose of infected plant material
- Improve air circulation around plants
- Water at soil level, avoid wetting leaves
- Apply preventive treatments if recommended
- Monitor daily for disease progression
";

const HEALTHY_NARRATIVE: &str = "\
Plant Health Status: HEALTHY
No diseases detected. Your crop appears to be in good condition!

Preventive Care Tips:
- Maintain regular watering schedule
- Ensure proper soil drainage
- Provide adequate nutrition
- Monitor for early signs of stress
- Keep growing area clean
";

/// Crop-specific care tips matched by case-insensitive substring against
/// the first identified crop.
const CROP_RULES: &[(&[&str], &str)] = &[
    (
        &["tomato"],
        "- Provide support/stakes for growth\n- Regular pruning of suckers\n- Deep, infrequent watering\n",
    ),
    (
        &["corn", "maize"],
        "- Ensure adequate spacing\n- Side-dress with nitrogen fertilizer\n- Monitor for corn borer\n",
    ),
    (
        &["wheat"],
        "- Monitor soil moisture\n- Watch for rust diseases\n- Time harvest properly\n",
    ),
    (
        &["rice"],
        "- Maintain proper water levels\n- Monitor for blast disease\n- Ensure good drainage during maturity\n",
    ),
];

const GENERIC_CROP_ADVICE: &str = "\
- Follow standard crop management practices\n- Monitor growth stages\n- Adjust care based on plant needs\n";

fn disease_advice(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (keywords, advice) in DISEASE_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return advice;
        }
    }
    UNMATCHED_DISEASE_ADVICE
}

fn crop_tips(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (keywords, tips) in CROP_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return tips;
        }
    }
    GENERIC_CROP_ADVICE
}

/// Builds the full fallback narrative for an analysis.
pub fn basic_recommendations(
    crops: &[CropSuggestion],
    diseases: &[DiseaseSuggestion],
) -> String {
    let mut out = String::from("Basic Treatment Recommendations:\n\n");

    if !diseases.is_empty() {
        out.push_str("Plant Health Issues Detected:\n");
        for disease in diseases {
            out.push_str(&format!("- {}: {}\n", disease.name, disease_advice(&disease.name)));
        }
        out.push('\n');
        out.push_str(GENERAL_DISEASE_MANAGEMENT);
    } else {
        out.push_str(HEALTHY_NARRATIVE);
    }

    if let Some(first) = crops.first() {
        out.push_str(&format!("\nSpecific Care for {}:\n", first.name));
        out.push_str(crop_tips(&first.name));
    }

    out
}
