// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for the treatment advisor.
//!
//! Two calling contexts with different sampling budgets: the diagnostic
//! path (web gateway, short narrative appended to analysis results) and the
//! conversational path (bot follow-ups, longer and more focused).

use cropsight_core::{CropSuggestion, DiseaseSuggestion};

/// Token budget for the diagnostic treatment narrative.
pub const DIAGNOSTIC_MAX_TOKENS: u32 = 300;
/// Sampling temperature for the diagnostic treatment narrative.
pub const DIAGNOSTIC_TEMPERATURE: f32 = 0.7;
/// Token budget for conversational consultation responses.
pub const CHAT_MAX_TOKENS: u32 = 600;
/// Sampling temperature for conversational consultation responses.
pub const CHAT_TEMPERATURE: f32 = 0.3;

/// System prompt for the diagnostic treatment path.
pub const CONSULTANT_SYSTEM_PROMPT: &str = "You are an expert agricultural consultant \
specializing in crop disease diagnosis and treatment.";

/// System prompt for the conversational consultation path.
pub const SPECIALIST_SYSTEM_PROMPT: &str = "\
You are an expert agricultural assistant and crop disease specialist. Your expertise includes:

- Crop disease identification and diagnosis
- Plant pathology and pest management
- Agricultural best practices and farming techniques
- Organic and chemical treatment recommendations
- Prevention strategies for crop diseases
- Soil health and nutrient management
- Climate-specific farming advice

IMPORTANT GUIDELINES:
1. Always provide SPECIFIC, ACTIONABLE advice
2. Include both immediate treatment and long-term prevention
3. Mention specific products, chemicals, or organic solutions when relevant
4. Consider the crop type, disease severity, and growing conditions
5. Provide step-by-step treatment instructions
6. Include timing recommendations (when to apply treatments)
7. Suggest monitoring practices to track progress
8. Keep responses focused on agriculture - avoid unrelated topics
9. Use simple, clear language without excessive formatting characters

Format your responses clearly with:
DIAGNOSIS: What the problem is
TREATMENT: Immediate actions to take
PREVENTION: How to avoid future issues
TIMELINE: When to apply treatments and expect results

Avoid using markdown formatting, emojis, or special characters. Keep it simple and readable.";

/// Builds the diagnostic treatment prompt from identification results.
pub fn treatment_prompt(crops: &[CropSuggestion], diseases: &[DiseaseSuggestion]) -> String {
    let mut prompt = String::from(
        "You are an expert agricultural consultant. Based on the following crop analysis \
         results, provide brief treatment and care recommendations:\n\n",
    );

    if !crops.is_empty() {
        prompt.push_str("Identified Crops:\n");
        for crop in crops {
            prompt.push_str(&format!(
                "- {} ({}): {}% confidence\n",
                crop.name, crop.scientific_name, crop.confidence
            ));
        }
    }

    if !diseases.is_empty() {
        prompt.push_str("\nDetected Plant Health Issues:\n");
        for disease in diseases {
            prompt.push_str(&format!(
                "- {}: {}% confidence\n",
                disease.name, disease.confidence
            ));
        }
    } else {
        prompt.push_str("\nNo diseases detected - plant appears healthy.\n");
    }

    prompt.push_str(
        "\nPlease provide:\n\
         1. Brief assessment of the plant condition\n\
         2. Immediate treatment recommendations (if needed)\n\
         3. General care tips\n\
         4. When to seek further consultation\n\n\
         Keep the response concise but informative (maximum 200 words).",
    );

    prompt
}

/// Builds the conversational prompt for a fresh photo analysis, threading
/// the user's caption in as additional context.
pub fn photo_analysis_prompt(summary: &str, caption: Option<&str>) -> String {
    format!(
        "CROP DISEASE ANALYSIS REQUEST\n\n\
         {summary}\n\n\
         USER'S ADDITIONAL CONTEXT: {}\n\n\
         TASK: Based on the crop and disease identification results above, provide:\n\n\
         1. IMMEDIATE DIAGNOSIS: What is likely happening to this crop?\n\
         2. TREATMENT PLAN: Specific steps to treat the identified issues\n\
         3. PREVENTION STRATEGY: How to prevent this problem in the future\n\
         4. MONITORING GUIDANCE: What to watch for and when to take action\n\n\
         Please be specific with product names, application rates, and timing when \
         possible. Focus on practical, actionable advice that a farmer can implement \
         immediately.",
        caption
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("No additional information provided")
    )
}

/// Builds the prompt for a free-text question when session memory holds a
/// previous analysis summary.
pub fn followup_prompt(last_summary: &str, question: &str) -> String {
    format!(
        "FOLLOW-UP AGRICULTURAL CONSULTATION\n\n\
         PREVIOUS CROP ANALYSIS:\n{last_summary}\n\n\
         USER'S NEW QUESTION: {question}\n\n\
         TASK: Provide specific, expert agricultural advice that directly addresses the \
         user's question while considering the previous crop analysis. Focus on:\n\
         - Practical solutions and treatments\n\
         - Product recommendations with application instructions\n\
         - Timeline for implementation and expected results\n\
         - Prevention strategies\n\
         - Monitoring and follow-up actions\n\n\
         Keep the response relevant to crop health and agriculture."
    )
}

/// Builds the prompt for a standalone question with no prior analysis.
pub fn standalone_prompt(question: &str) -> String {
    format!(
        "AGRICULTURAL CONSULTATION REQUEST\n\n\
         USER'S QUESTION: {question}\n\n\
         TASK: As an expert agricultural consultant, provide comprehensive advice on this \
         farming/crop-related question. Include:\n\
         - Direct answer to the question\n\
         - Best practice recommendations\n\
         - Specific product or method suggestions when applicable\n\
         - Implementation timeline and steps\n\
         - What to monitor for success\n\n\
         Focus on practical, actionable advice that helps improve crop health and farming \
         outcomes."
    )
}
