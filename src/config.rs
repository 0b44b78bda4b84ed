//! Configuration management for the `tripflow` service
//!
//! Serde defaults carry the upstream service contracts; every interesting
//! value can be overridden through `TRIPFLOW_*` environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Root configuration structure for the `tripflow` service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripflowConfig {
    /// Text-completion backend settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Remote geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Local gazetteer dataset settings
    #[serde(default)]
    pub gazetteer: GazetteerConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Text-completion backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat endpoint host
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier passed through to the backend
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Request timeout in seconds. Completions are slow; tens of seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
    /// Sampling temperature. Low, extraction should be deterministic
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Context window passed to the backend
    #[serde(default = "default_llm_num_ctx")]
    pub num_ctx: u32,
}

/// Remote geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the forward geocoding endpoint
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Single-digit, lookups should be fast
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u64,
}

/// Local gazetteer dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerConfig {
    /// Path of the JSON dataset loaded at startup
    #[serde(default = "default_gazetteer_path")]
    pub path: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory served under `/assets`
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    /// Upper bound for uploaded image bodies
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

// Default value functions
fn default_llm_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "qwen3:8b".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_llm_temperature() -> f32 {
    0.1
}

fn default_llm_num_ctx() -> u32 {
    4096
}

fn default_geocoding_base_url() -> String {
    "https://photon.komoot.io/api/".to_string()
}

fn default_geocoding_timeout() -> u64 {
    8
}

fn default_gazetteer_path() -> String {
    "assets/locations.json".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_seconds: default_llm_timeout(),
            temperature: default_llm_temperature(),
            num_ctx: default_llm_num_ctx(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_geocoding_timeout(),
        }
    }
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            path: default_gazetteer_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            assets_dir: default_assets_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for TripflowConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            geocoding: GeocodingConfig::default(),
            gazetteer: GazetteerConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl TripflowConfig {
    /// Defaults with `TRIPFLOW_*` environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var("TRIPFLOW_LLM_BASE_URL") {
            config.llm.base_url = value;
        }
        if let Ok(value) = env::var("TRIPFLOW_LLM_MODEL") {
            config.llm.model = value;
        }
        if let Ok(value) = env::var("TRIPFLOW_GEOCODING_BASE_URL") {
            config.geocoding.base_url = value;
        }
        if let Ok(value) = env::var("TRIPFLOW_GAZETTEER_PATH") {
            config.gazetteer.path = value;
        }
        if let Ok(value) = env::var("TRIPFLOW_PORT") {
            match value.parse() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring non-numeric TRIPFLOW_PORT '{}'", value),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TripflowConfig::default();
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.timeout_seconds, 60);
        assert!((config.llm.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.geocoding.timeout_seconds, 8);
        assert_eq!(config.gazetteer.path, "assets/locations.json");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: TripflowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.llm.model, "qwen3:8b");
        assert_eq!(config.geocoding.base_url, "https://photon.komoot.io/api/");
    }

    #[test]
    fn test_partial_override() {
        let config: TripflowConfig =
            serde_json::from_str(r#"{"llm": {"model": "llama3"}}"#).unwrap();
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.num_ctx, 4096);
    }
}
