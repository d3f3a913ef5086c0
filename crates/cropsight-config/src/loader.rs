// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cropsight.toml` > `~/.config/cropsight/cropsight.toml`
//! > `/etc/cropsight/cropsight.toml` with environment variable overrides via
//! the `CROPSIGHT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CropsightConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cropsight/cropsight.toml` (system-wide)
/// 3. `~/.config/cropsight/cropsight.toml` (user XDG config)
/// 4. `./cropsight.toml` (local directory)
/// 5. `CROPSIGHT_*` environment variables
pub fn load_config() -> Result<CropsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CropsightConfig::default()))
        .merge(Toml::file("/etc/cropsight/cropsight.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cropsight/cropsight.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cropsight.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CropsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CropsightConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CropsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CropsightConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CROPSIGHT_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("CROPSIGHT_").map(|key| {
        // Figment passes the key with prefix stripped but case preserved,
        // so normalize before matching section prefixes.
        // Example: CROPSIGHT_KINDWISE_API_KEY -> "kindwise_api_key"
        let key_str = key.as_str().to_lowercase();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("kindwise_", "kindwise.", 1)
            .replacen("openrouter_", "openrouter.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("store_", "store.", 1)
            .replacen("image_", "image.", 1);
        mapped.into()
    })
}
