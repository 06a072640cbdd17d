//! Publisher trait and request/receipt types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use postmill_core::Platform;
use postmill_error::PublishResult;
use serde::{Deserialize, Serialize};

/// Content handed to a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    content: String,
    image_ref: Option<String>,
}

impl PublishRequest {
    /// Create a request.
    pub fn new(content: impl Into<String>, image_ref: Option<String>) -> Self {
        Self {
            content: content.into(),
            image_ref,
        }
    }

    /// Image reference when it points at a real image.
    pub fn real_image(&self) -> Option<&str> {
        self.image_ref
            .as_deref()
            .filter(|url| !url.trim().is_empty() && !url.contains("placeholder.svg"))
    }
}

/// Successful publish result.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    platform: Platform,
    external_post_id: String,
    posted_at: DateTime<Utc>,
    /// Set when nothing reached the platform.
    #[serde(default)]
    simulated: bool,
}

impl PublishReceipt {
    /// Receipt stamped with the current time.
    pub fn now(platform: Platform, external_post_id: impl Into<String>) -> Self {
        Self {
            platform,
            external_post_id: external_post_id.into(),
            posted_at: Utc::now(),
            simulated: false,
        }
    }

    /// Receipt for a publish that was accepted but never sent.
    pub fn new_simulated(platform: Platform, external_post_id: impl Into<String>) -> Self {
        Self {
            simulated: true,
            ..Self::now(platform, external_post_id)
        }
    }
}

/// A per-platform publishing strategy.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Platform this publisher serves.
    fn platform(&self) -> Platform;

    /// Publish content.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Credentials are missing, expired or lack permissions
    /// - Content is empty or the platform needs an image that was not supplied
    /// - The platform API rejects the post
    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt>;

    /// Check that configured credentials are usable.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the credentials cannot be used.
    async fn verify_credentials(&self) -> PublishResult<()> {
        Ok(())
    }
}
