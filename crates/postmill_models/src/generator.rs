//! Generation traits and request/response types.

use async_trait::async_trait;
use derive_getters::Getters;
use postmill_core::{ContentType, Platform, Tone};
use postmill_error::GenerationResult;
use serde::{Deserialize, Serialize};

/// Request for one piece of post content.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    /// Platform the content is written for.
    platform: Platform,

    /// Topic seed; empty or absent selects a default topic.
    #[builder(default)]
    #[serde(default)]
    topic: Option<String>,

    /// Tone label.
    #[builder(default)]
    #[serde(default)]
    tone: Option<Tone>,

    /// Ask for hashtags at the end of the post.
    #[builder(default = "true")]
    #[serde(default = "default_include_hashtags")]
    include_hashtags: bool,

    /// Shape of the content.
    #[builder(default)]
    #[serde(default)]
    content_type: ContentType,

    /// Produce an image reference alongside the text.
    #[builder(default)]
    #[serde(default)]
    generate_image: bool,
}

fn default_include_hashtags() -> bool {
    true
}

/// Generated post content.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    /// Sanitized, trimmed, non-empty post text.
    text: String,
    /// Prompt used for the image, if one was requested.
    image_prompt: Option<String>,
    /// Image reference, possibly a placeholder.
    image_ref: Option<String>,
    /// Model that produced the text.
    model: String,
    /// Topic actually used (after default resolution).
    topic: String,
}

impl GeneratedContent {
    /// Assemble generated content.
    pub fn new(
        text: impl Into<String>,
        image_prompt: Option<String>,
        image_ref: Option<String>,
        model: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            image_prompt,
            image_ref,
            model: model.into(),
            topic: topic.into(),
        }
    }
}

/// Produces post content for the automation engine.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate content for a request.
    ///
    /// # Errors
    ///
    /// Returns a generation error when no model produced usable text. The
    /// caller must not publish anything for the item in that case.
    async fn generate(&self, request: &ContentRequest) -> GenerationResult<GeneratedContent>;
}

/// A single text model attempt in a fallback chain.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Name of the underlying model.
    fn model_name(&self) -> &str;

    /// Complete a prompt, returning raw model output.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, API or parse failure.
    async fn complete(&self, prompt: &str) -> GenerationResult<String>;
}
