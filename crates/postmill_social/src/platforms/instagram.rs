//! Instagram business account publisher.

use super::{http_client, require_content, transport_error};
use crate::config::credential;
use crate::graph::{classify_error, post_id};
use crate::{InstagramConfig, PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use postmill_core::Platform;
use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

/// Publishes an image post through a media container.
#[derive(Debug, Clone)]
pub struct InstagramPublisher {
    client: Client,
    config: InstagramConfig,
}

impl InstagramPublisher {
    /// Create a publisher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: InstagramConfig) -> PublishResult<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }

    fn credentials(&self) -> PublishResult<(&str, &str)> {
        match (
            credential(&self.config.account_id),
            credential(&self.config.access_token),
        ) {
            (Some(account), Some(token)) => Ok((account, token)),
            _ => Err(PublishError::new(PublishErrorKind::MissingCredentials(
                "Instagram business account id and access token are required".to_string(),
            ))),
        }
    }

    async fn post_json(&self, url: String, body: Value) -> PublishResult<String> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(classify_error(status, &body));
        }
        post_id(&body).ok_or_else(|| {
            PublishError::new(PublishErrorKind::Failed(
                "Instagram response did not include an id".to_string(),
            ))
        })
    }
}

#[async_trait]
impl Publisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    #[instrument(skip(self, request), fields(chars = request.content().len()))]
    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt> {
        let (account_id, token) = self.credentials()?;
        require_content(request.content())?;
        let image = request.real_image().ok_or_else(|| {
            PublishError::new(PublishErrorKind::Validation(
                "Instagram posts require an image".to_string(),
            ))
        })?;

        let container = self
            .post_json(
                format!("{}/{}/media", self.config.base_url, account_id),
                json!({
                    "image_url": image,
                    "caption": request.content(),
                    "access_token": token,
                }),
            )
            .await?;
        debug!(container = %container, "Instagram media container created");

        let id = self
            .post_json(
                format!("{}/{}/media_publish", self.config.base_url, account_id),
                json!({
                    "creation_id": container,
                    "access_token": token,
                }),
            )
            .await?;
        info!(post_id = %id, "Published to Instagram");
        Ok(PublishReceipt::now(Platform::Instagram, id))
    }

    async fn verify_credentials(&self) -> PublishResult<()> {
        self.credentials().map(|_| ())
    }
}
