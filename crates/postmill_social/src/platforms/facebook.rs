//! Facebook page publisher.

use super::{http_client, require_content, transport_error};
use crate::config::credential;
use crate::graph::{classify_error, post_id};
use crate::{FacebookConfig, PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use postmill_core::Platform;
use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Publishes to a Facebook page feed, or as a photo when a real image is given.
#[derive(Debug, Clone)]
pub struct FacebookPublisher {
    client: Client,
    config: FacebookConfig,
}

impl FacebookPublisher {
    /// Create a publisher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FacebookConfig) -> PublishResult<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }

    fn credentials(&self) -> PublishResult<(&str, &str)> {
        match (
            credential(&self.config.page_id),
            credential(&self.config.access_token),
        ) {
            (Some(page), Some(token)) => Ok((page, token)),
            _ => Err(PublishError::new(PublishErrorKind::MissingCredentials(
                "Facebook page id and access token are required (FB_PAGE_ID, FB_ACCESS_TOKEN)"
                    .to_string(),
            ))),
        }
    }

    async fn check_token(&self, token: &str) -> PublishResult<()> {
        let response = self
            .client
            .get(format!("{}/me", self.config.base_url))
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| {
                PublishError::new(PublishErrorKind::Failed(format!(
                    "Token validation failed: {}",
                    e
                )))
            })?;

        if response.status().is_success() {
            return Ok(());
        }
        warn!(status = %response.status(), "Facebook token check failed");
        Err(PublishError::new(PublishErrorKind::TokenExpired(
            "Access token expired. Update FB_ACCESS_TOKEN with a new long-lived token".to_string(),
        )))
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    #[instrument(skip(self, request), fields(chars = request.content().len()))]
    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt> {
        let (page_id, token) = self.credentials()?;
        require_content(request.content())?;
        self.check_token(token).await?;

        let (endpoint, form) = match request.real_image() {
            Some(image) => (
                format!("{}/{}/photos", self.config.base_url, page_id),
                vec![
                    ("caption", request.content().as_str()),
                    ("url", image),
                    ("access_token", token),
                ],
            ),
            None => (
                format!("{}/{}/feed", self.config.base_url, page_id),
                vec![
                    ("message", request.content().as_str()),
                    ("access_token", token),
                ],
            ),
        };
        debug!(endpoint = %endpoint, "Posting to Facebook");

        let response = self
            .client
            .post(&endpoint)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let id = post_id(&body).ok_or_else(|| {
            PublishError::new(PublishErrorKind::Failed(
                "Facebook response did not include a post id".to_string(),
            ))
        })?;
        info!(post_id = %id, "Published to Facebook");
        Ok(PublishReceipt::now(Platform::Facebook, id))
    }

    async fn verify_credentials(&self) -> PublishResult<()> {
        let (_, token) = self.credentials()?;
        self.check_token(token).await
    }
}
