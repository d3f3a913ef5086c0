// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde attributes cannot express, such as
//! required secrets for the selected front end and sane numeric ranges.

use crate::model::CropsightConfig;

/// Which front end the binary is starting, selecting the secrets that must
/// be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontend {
    /// Web gateway (`serve` subcommand).
    Gateway,
    /// Telegram bot (`bot` subcommand).
    Bot,
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<String>)` with all
/// collected validation errors (does not fail fast).
pub fn validate_config(config: &CropsightConfig, frontend: Frontend) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config
        .kindwise
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        errors.push(
            "kindwise.api_key is required (set CROPSIGHT_KINDWISE_API_KEY or add it to cropsight.toml)"
                .to_string(),
        );
    }

    if config
        .openrouter
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        errors.push(
            "openrouter.api_key is required (set CROPSIGHT_OPENROUTER_API_KEY or add it to cropsight.toml)"
                .to_string(),
        );
    }

    if frontend == Frontend::Bot
        && config
            .telegram
            .bot_token
            .as_deref()
            .is_none_or(|t| t.trim().is_empty())
    {
        errors.push(
            "telegram.bot_token is required for the bot front end (set CROPSIGHT_TELEGRAM_BOT_TOKEN)"
                .to_string(),
        );
    }

    if config.gateway.host.trim().is_empty() {
        errors.push("gateway.host must not be empty".to_string());
    }

    if config.store.upload_dir.trim().is_empty() {
        errors.push("store.upload_dir must not be empty".to_string());
    }

    if config.image.max_edge == 0 {
        errors.push("image.max_edge must be at least 1 pixel".to_string());
    }

    if config.image.jpeg_quality == 0 || config.image.jpeg_quality > 100 {
        errors.push(format!(
            "image.jpeg_quality must be in 1..=100, got {}",
            config.image.jpeg_quality
        ));
    }

    if config.kindwise.timeout_secs == 0 {
        errors.push("kindwise.timeout_secs must be at least 1".to_string());
    }

    if config.openrouter.timeout_secs == 0 {
        errors.push("openrouter.timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
