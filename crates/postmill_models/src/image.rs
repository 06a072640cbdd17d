//! Image reference resolution.

use postmill_error::{GenerationError, GenerationErrorKind, GenerationResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PLACEHOLDER_PATH: &str = "/placeholder.svg";

/// Placeholder image reference carrying the prompt as a query.
pub fn placeholder_image_url(prompt: &str) -> String {
    let query: String = url::form_urlencoded::byte_serialize(prompt.as_bytes()).collect();
    format!("{PLACEHOLDER_PATH}?height=400&width=600&query={query}")
}

/// Whether an image reference is a placeholder rather than a real image.
pub fn is_placeholder_image(image_ref: &str) -> bool {
    image_ref.contains("placeholder.svg")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_url: String,
}

/// Client for an external image generation service.
///
/// The service accepts `{"prompt": ...}` and answers `{"imageUrl": ...}`.
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
}

impl ImageClient {
    /// Create a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> GenerationResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            GenerationError::new(GenerationErrorKind::Http(format!(
                "Failed to build image client: {}",
                e
            )))
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Request an image for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or a
    /// malformed body.
    #[instrument(skip(self, prompt), fields(endpoint = %self.endpoint))]
    pub async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "prompt": prompt }))
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

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Parse(e.to_string())))?;
        debug!("Image generated");
        Ok(body.image_url)
    }

    /// Request an image, degrading to a placeholder on any failure.
    pub async fn generate_or_placeholder(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Image generation failed, using placeholder");
                placeholder_image_url(prompt)
            }
        }
    }
}
