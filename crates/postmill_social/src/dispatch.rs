//! Routing content to platform publishers.

use crate::{
    FacebookPublisher, InstagramPublisher, LinkedinPublisher, PlatformsConfig, PublishReceipt,
    PublishRequest, Publisher, TwitterPublisher,
};
use derive_getters::Getters;
use futures::future::join_all;
use postmill_core::Platform;
use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Normalized result of publishing to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOutcome {
    platform: Platform,
    success: bool,
    external_post_id: Option<String>,
    error: Option<String>,
    category: Option<String>,
    /// Accepted without reaching the platform.
    #[serde(default)]
    simulated: bool,
}

impl PlatformOutcome {
    /// Successful outcome.
    pub fn succeeded(platform: Platform, external_post_id: impl Into<String>) -> Self {
        Self {
            platform,
            success: true,
            external_post_id: Some(external_post_id.into()),
            error: None,
            category: None,
            simulated: false,
        }
    }

    /// Successful outcome whose post was never sent.
    pub fn new_simulated(platform: Platform, external_post_id: impl Into<String>) -> Self {
        Self {
            simulated: true,
            ..Self::succeeded(platform, external_post_id)
        }
    }

    /// Failed outcome from a publish error.
    pub fn failed(platform: Platform, error: &PublishError) -> Self {
        Self {
            platform,
            success: false,
            external_post_id: None,
            error: Some(error.kind.message().to_string()),
            category: Some(error.category().to_string()),
            simulated: false,
        }
    }

    fn from_result(platform: Platform, result: PublishResult<PublishReceipt>) -> Self {
        match result {
            Ok(receipt) if *receipt.simulated() => {
                warn!(platform = %platform, "Publish simulated; nothing was sent");
                Self::new_simulated(platform, receipt.external_post_id().clone())
            }
            Ok(receipt) => Self::succeeded(platform, receipt.external_post_id().clone()),
            Err(e) => {
                warn!(platform = %platform, error = %e.kind, "Publish failed");
                Self::failed(platform, &e)
            }
        }
    }
}

/// Publisher registry keyed by platform.
#[derive(Clone, Default)]
pub struct PublisherDispatch {
    publishers: HashMap<Platform, Arc<dyn Publisher>>,
}

impl std::fmt::Debug for PublisherDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut platforms: Vec<_> = self.publishers.keys().collect();
        platforms.sort();
        f.debug_struct("PublisherDispatch")
            .field("platforms", &platforms)
            .finish()
    }
}

impl PublisherDispatch {
    /// Create an empty dispatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher, replacing any previous one for its platform.
    pub fn register(&mut self, publisher: Arc<dyn Publisher>) {
        self.publishers.insert(publisher.platform(), publisher);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.register(publisher);
        self
    }

    /// Dispatch with the production publisher for every platform.
    ///
    /// Missing credentials are reported per publish, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &PlatformsConfig) -> PublishResult<Self> {
        Ok(Self::new()
            .with(Arc::new(FacebookPublisher::new(config.facebook.clone())?))
            .with(Arc::new(InstagramPublisher::new(config.instagram.clone())?))
            .with(Arc::new(TwitterPublisher::new(config.twitter.clone())))
            .with(Arc::new(LinkedinPublisher::new(config.linkedin.clone())?)))
    }

    /// Publisher registered for a platform.
    pub fn get(&self, platform: Platform) -> Option<&Arc<dyn Publisher>> {
        self.publishers.get(&platform)
    }

    /// Publish to a single platform.
    ///
    /// # Errors
    ///
    /// Returns [`PublishErrorKind::Unsupported`] if no publisher is
    /// registered, otherwise whatever the publisher reports.
    #[instrument(skip(self, content, image_ref))]
    pub async fn publish(
        &self,
        platform: Platform,
        content: &str,
        image_ref: Option<&str>,
    ) -> PublishResult<PublishReceipt> {
        let publisher = self.publishers.get(&platform).ok_or_else(|| {
            PublishError::new(PublishErrorKind::Unsupported(platform.to_string()))
        })?;
        let request = PublishRequest::new(content, image_ref.map(str::to_string));
        publisher.publish(&request).await
    }

    /// Publish to several platforms concurrently.
    ///
    /// Returns exactly one outcome per requested platform, in request order.
    /// A failure on one platform never affects the others.
    #[instrument(skip(self, platforms, content, image_ref), fields(count = platforms.len()))]
    pub async fn publish_all(
        &self,
        platforms: &[Platform],
        content: &str,
        image_ref: Option<&str>,
    ) -> Vec<PlatformOutcome> {
        let calls = platforms.iter().map(|&platform| async move {
            let result = self.publish(platform, content, image_ref).await;
            PlatformOutcome::from_result(platform, result)
        });
        join_all(calls).await
    }
}
