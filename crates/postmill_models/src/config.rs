//! Content generation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key; falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Models tried in order until one succeeds.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Base URL of the generation REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries per model for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial retry backoff in milliseconds.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Optional image generation endpoint; placeholders are used without it.
    #[serde(default)]
    pub image_service_url: Option<String>,
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.5-pro".to_string(),
        "gemini-2.5-flash".to_string(),
        "gemini-2.5-flash-lite".to_string(),
    ]
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff() -> u64 {
    500
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: default_models(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
            image_service_url: None,
        }
    }
}

impl GenerationConfig {
    /// API key from configuration or the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}
