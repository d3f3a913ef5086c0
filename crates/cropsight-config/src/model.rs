// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cropsight pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Cropsight configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CropsightConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Identification (vision) service settings.
    #[serde(default)]
    pub kindwise: KindwiseConfig,

    /// Language-model (treatment advisor) settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Web gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Handoff store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Image normalization settings.
    #[serde(default)]
    pub image: ImageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "cropsight".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Identification service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KindwiseConfig {
    /// API key for the identification service. `None` fails validation at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Identification endpoint URL.
    #[serde(default = "default_kindwise_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for KindwiseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_kindwise_url(),
            timeout_secs: default_request_timeout(),
        }
    }
}

fn default_kindwise_url() -> String {
    "https://crop.kindwise.com/api/v1/identification".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Language-model service configuration (OpenRouter-compatible).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// Bearer API key. `None` fails validation at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions base URL.
    #[serde(default = "default_openrouter_base")]
    pub base_url: String,

    /// Model identifier to request.
    #[serde(default = "default_openrouter_model")]
    pub model: String,

    /// Value sent in the HTTP-Referer attribution header.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value sent in the X-Title attribution header.
    #[serde(default = "default_title")]
    pub title: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openrouter_base(),
            model: default_openrouter_model(),
            referer: default_referer(),
            title: default_title(),
            timeout_secs: default_request_timeout(),
        }
    }
}

fn default_openrouter_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openrouter_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_referer() -> String {
    "http://localhost:8000".to_string()
}

fn default_title() -> String {
    "Cropsight".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram adapter.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Web gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "0.0.0.0".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}

/// Handoff store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory the single-slot handoff artifacts are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

/// Image normalization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Maximum length of the longest image edge in pixels.
    #[serde(default = "default_max_edge")]
    pub max_edge: u32,

    /// JPEG re-encode quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_edge: default_max_edge(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_edge() -> u32 {
    1024
}

fn default_jpeg_quality() -> u8 {
    95
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = CropsightConfig::default();
        assert_eq!(config.agent.name, "cropsight");
        assert_eq!(config.agent.log_level, "info");
        assert!(config.kindwise.api_key.is_none());
        assert_eq!(
            config.kindwise.api_url,
            "https://crop.kindwise.com/api/v1/identification"
        );
        assert_eq!(config.openrouter.model, "deepseek/deepseek-chat");
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.store.upload_dir, "uploads");
        assert_eq!(config.image.max_edge, 1024);
        assert_eq!(config.image.jpeg_quality, 95);
        assert_eq!(config.kindwise.timeout_secs, 30);
        assert_eq!(config.openrouter.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[kindwise]
api_key = "kw-test"

[telegram]
bot_token = "123:abc"
"#;
        let config: CropsightConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.kindwise.api_key.as_deref(), Some("kw-test"));
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        // Unspecified sections keep their defaults.
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.image.max_edge, 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[kindwise]
api_kye = "typo"
"#;
        assert!(toml::from_str::<CropsightConfig>(toml_str).is_err());
    }
}
