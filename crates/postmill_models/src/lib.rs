//! Content generation client for Postmill.
//!
//! Given a platform, topic and tone this crate produces post text (and
//! optionally an image reference) through a generative model. The client is
//! a black box to the automation engine: it either returns clean, non-empty
//! text or a [`GenerationError`](postmill_error::GenerationError).
//!
//! # Architecture
//!
//! - [`ContentGenerator`]: the trait the engine depends on
//! - [`ContentClient`]: prompt construction, an ordered model fallback chain,
//!   output sanitation and image resolution
//! - [`TextModel`]: one generation attempt; [`GeminiModel`] talks to the
//!   Gemini REST API with transient-error retry
//!
//! # Example
//!
//! ```no_run
//! use postmill_core::{Platform, Tone};
//! use postmill_models::{ContentClient, ContentGenerator, ContentRequestBuilder, GenerationConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ContentClient::gemini(&GenerationConfig::default())?;
//! let request = ContentRequestBuilder::default()
//!     .platform(Platform::Linkedin)
//!     .tone(Some(Tone::Professional))
//!     .build()?;
//! let content = client.generate(&request).await?;
//! println!("{}", content.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod gemini;
mod generator;
mod image;
mod prompt;
mod sanitize;
mod topics;

pub use client::ContentClient;
pub use config::GenerationConfig;
pub use gemini::GeminiModel;
pub use generator::{
    ContentGenerator, ContentRequest, ContentRequestBuilder, GeneratedContent, TextModel,
};
pub use image::{ImageClient, is_placeholder_image, placeholder_image_url};
pub use prompt::{build_prompt, image_prompt, wants_image};
pub use sanitize::sanitize;
pub use topics::{DEFAULT_TOPICS, resolve_topic};
