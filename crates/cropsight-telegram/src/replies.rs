// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts for the Telegram bot.
//!
//! Every failure the bot can hit maps to exactly one of these, keyed off the
//! error variant rather than substring-matching error messages.

use cropsight_core::CropsightError;

pub const WELCOME: &str = "\
Welcome to the Crop Disease Detection & Agricultural Assistant Bot!

What I can help you with:
- Disease Diagnosis - Send crop photos for disease identification
- Treatment Plans - Get specific treatment recommendations
- Prevention Advice - Learn how to prevent crop diseases
- Agricultural Guidance - Ask any farming or crop-related questions

For best results when sending photos:
- Take clear, well-lit images of affected plants
- Focus on diseased areas or symptoms
- Include context about your location and growing conditions

Ask me questions like:
\"How do I treat leaf blight in tomatoes?\"
\"What's the best fertilizer schedule for corn?\"
\"How can I prevent fungal infections?\"

Ready to help improve your crop health!";

pub const HELP_GUIDE: &str = "\
Crop Disease Detection Bot - Help Guide

Photo Analysis:
- Send clear crop/plant photos
- Include affected areas and symptoms
- Add context: location, weather, timing
- Get disease identification + treatment plans

Ask Questions About:
- Disease treatment and prevention
- Fertilizer and nutrient management
- Pest control strategies
- Crop rotation and planning
- Soil health improvement
- Organic vs chemical solutions

Pro Tips:
- Mention your crop type and growth stage
- Include recent weather conditions
- Specify if you've tried any treatments
- Ask about timing for best results

Example Questions:
\"My tomato leaves have brown spots, what should I do?\"
\"Best time to apply fungicide to wheat?\"
\"How to improve soil for corn planting?\"

Follow-up: After photo analysis, ask specific questions for detailed guidance!";

pub const PROCESSING_NOTICE: &str = "📸 Processing your image...";
pub const ANALYZING_NOTICE: &str = "🔍 Analyzing your crop image...";

pub const DOWNLOAD_TIMED_OUT: &str = "⏱️ Download timed out after multiple attempts. \
    Please try sending a smaller image or try again later.";
pub const DOWNLOAD_NETWORK_ERROR: &str =
    "🌐 Network error. Please check your connection and try again.";

pub const ANALYSIS_TIMED_OUT: &str =
    "⏱️ Analysis timed out. The identification service might be slow. Please try again.";
pub const SERVICE_UNREACHABLE: &str =
    "🔌 Cannot connect to the analysis service. Please try again later.";

/// Reply for a failed photo analysis.
pub fn analysis_failure(error: &CropsightError) -> String {
    match error {
        CropsightError::Timeout { .. } => ANALYSIS_TIMED_OUT.to_string(),
        CropsightError::Network { .. } => SERVICE_UNREACHABLE.to_string(),
        other => format!("❌ Error analyzing image: {other}"),
    }
}

/// Reply for a failed free-text consultation. Unlike photo analysis there is
/// no rule fallback here, so the user sees what went wrong.
pub fn consultation_failure(error: &CropsightError) -> String {
    match error {
        CropsightError::Timeout { .. } => "⏳ Request timed out. Please try again.".to_string(),
        CropsightError::RemoteService { status: 401, .. } => {
            "⚠️ AI service authentication failed. Please check the configured API key.".to_string()
        }
        CropsightError::RemoteService { status: 429, .. } => {
            "⚠️ AI service rate limit exceeded. Please try again later.".to_string()
        }
        other => format!("⚠️ AI service error: {other}"),
    }
}

/// Reply for failures outside the known categories.
pub fn unexpected_failure(error: &CropsightError) -> String {
    format!("❌ Unexpected error: {error}")
}
