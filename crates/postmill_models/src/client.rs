//! Content client with model fallback.

use crate::{
    ContentGenerator, ContentRequest, GeminiModel, GeneratedContent, GenerationConfig,
    ImageClient, TextModel, build_prompt, image_prompt, placeholder_image_url, resolve_topic,
    sanitize, wants_image,
};
use async_trait::async_trait;
use postmill_error::{GenerationError, GenerationErrorKind, GenerationResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Content generator backed by an ordered chain of text models.
///
/// Models are tried in order. A model that errors or returns text that is
/// empty after sanitation is skipped in favor of the next one. If every model
/// fails the request fails with [`GenerationErrorKind::AllModelsFailed`].
#[derive(Clone)]
pub struct ContentClient {
    chain: Vec<Arc<dyn TextModel>>,
    images: Option<ImageClient>,
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field(
                "chain",
                &self.chain.iter().map(|m| m.model_name()).collect::<Vec<_>>(),
            )
            .field("images", &self.images)
            .finish()
    }
}

impl ContentClient {
    /// Create a client from an explicit model chain.
    pub fn new(chain: Vec<Arc<dyn TextModel>>) -> Self {
        Self {
            chain,
            images: None,
        }
    }

    /// Attach an image generation service.
    pub fn with_images(mut self, images: ImageClient) -> Self {
        self.images = Some(images);
        self
    }

    /// Create a Gemini-backed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available or an HTTP client
    /// cannot be built.
    pub fn gemini(config: &GenerationConfig) -> GenerationResult<Self> {
        let chain = config
            .models
            .iter()
            .map(|name| {
                GeminiModel::new(name.clone(), config).map(|m| Arc::new(m) as Arc<dyn TextModel>)
            })
            .collect::<GenerationResult<Vec<_>>>()?;

        let mut client = Self::new(chain);
        if let Some(endpoint) = &config.image_service_url {
            client = client.with_images(ImageClient::new(
                endpoint.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?);
        }
        Ok(client)
    }

    /// Names of the models in fallback order.
    pub fn models(&self) -> Vec<&str> {
        self.chain.iter().map(|m| m.model_name()).collect()
    }

    async fn resolve_image(&self, prompt: &str) -> String {
        match &self.images {
            Some(images) => images.generate_or_placeholder(prompt).await,
            None => placeholder_image_url(prompt),
        }
    }
}

#[async_trait]
impl ContentGenerator for ContentClient {
    #[instrument(skip(self, request), fields(platform = %request.platform()))]
    async fn generate(&self, request: &ContentRequest) -> GenerationResult<GeneratedContent> {
        if self.chain.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::NoModels));
        }

        let topic = resolve_topic(request.topic().as_deref());
        let prompt = build_prompt(request, &topic);
        let mut failures = Vec::new();

        for model in &self.chain {
            let name = model.model_name();
            let raw = match model.complete(&prompt).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(model = name, error = %e, "Model failed, trying next");
                    failures.push(format!("{}: {}", name, e.kind));
                    continue;
                }
            };

            let text = sanitize(&raw);
            if text.is_empty() {
                warn!(model = name, "Model returned empty output, trying next");
                failures.push(format!("{}: {}", name, GenerationErrorKind::EmptyOutput));
                continue;
            }

            info!(model = name, chars = text.len(), "Content generated");
            let (image_prompt, image_ref) = if wants_image(request) {
                let prompt = image_prompt(&topic);
                let image = self.resolve_image(&prompt).await;
                (Some(prompt), Some(image))
            } else {
                (None, None)
            };

            return Ok(GeneratedContent::new(
                text,
                image_prompt,
                image_ref,
                name,
                topic,
            ));
        }

        Err(GenerationError::new(GenerationErrorKind::AllModelsFailed(
            failures,
        )))
    }
}
