//! Gemini REST text model.

use crate::{GenerationConfig, TextModel};
use async_trait::async_trait;
use postmill_error::{GenerationError, GenerationErrorKind, GenerationResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, instrument, warn};

const MAX_RETRY_DELAY_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// One Gemini model reached over the `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    max_retries: usize,
    retry_backoff_ms: u64,
}

impl GeminiModel {
    /// Create a model client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] when no key is
    /// configured or present in the environment.
    pub fn new(model: impl Into<String>, config: &GenerationConfig) -> GenerationResult<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            client,
            model: model.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn request_once(&self, prompt: &str) -> GenerationResult<String> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Parse(e.to_string())))?;
        Ok(parsed.into_text())
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> GenerationResult<String> {
        let strategy = ExponentialBackoff::from_millis(self.retry_backoff_ms)
            .factor(2)
            .max_delay(Duration::from_secs(MAX_RETRY_DELAY_SECS))
            .map(jitter)
            .take(self.max_retries);

        let text = Retry::spawn(strategy, || async move {
            match self.request_once(prompt).await {
                Ok(text) => Ok(text),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Transient generation error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await?;

        debug!(chars = text.len(), "Model responded");
        Ok(text)
    }
}
