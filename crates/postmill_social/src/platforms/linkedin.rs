//! LinkedIn publisher.

use super::{http_client, require_content, transport_error};
use crate::config::credential;
use crate::{LinkedinConfig, PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use postmill_core::Platform;
use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{info, instrument};

/// Publishes a text share as a UGC post.
#[derive(Debug, Clone)]
pub struct LinkedinPublisher {
    client: Client,
    config: LinkedinConfig,
}

impl LinkedinPublisher {
    /// Create a publisher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: LinkedinConfig) -> PublishResult<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }

    fn credentials(&self) -> PublishResult<(&str, &str)> {
        match (
            credential(&self.config.person_id),
            credential(&self.config.access_token),
        ) {
            (Some(person), Some(token)) => Ok((person, token)),
            _ => Err(PublishError::new(PublishErrorKind::MissingCredentials(
                "LinkedIn person id and access token are required".to_string(),
            ))),
        }
    }
}

fn ugc_body(person_id: &str, content: &str) -> Value {
    json!({
        "author": format!("urn:li:person:{}", person_id),
        "lifecycleState": "PUBLISHED",
        "specificContent": {
            "com.linkedin.ugc.ShareContent": {
                "shareCommentary": { "text": content },
                "shareMediaCategory": "NONE"
            }
        },
        "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" }
    })
}

#[async_trait]
impl Publisher for LinkedinPublisher {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    #[instrument(skip(self, request), fields(chars = request.content().len()))]
    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt> {
        let (person_id, token) = self.credentials()?;
        require_content(request.content())?;

        let response = self
            .client
            .post(format!("{}/v2/ugcPosts", self.config.base_url))
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&ugc_body(person_id, request.content()))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let header_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("LinkedIn API error: {}", status));
            let kind = match status {
                StatusCode::UNAUTHORIZED => PublishErrorKind::TokenExpired(message),
                StatusCode::FORBIDDEN => PublishErrorKind::Permission(message),
                _ => PublishErrorKind::Failed(message),
            };
            return Err(PublishError::new(kind));
        }

        let id = header_id
            .or_else(|| body.get("id").and_then(Value::as_str).map(str::to_string))
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::Failed(
                    "LinkedIn response did not include a post id".to_string(),
                ))
            })?;
        info!(post_id = %id, "Published to LinkedIn");
        Ok(PublishReceipt::now(Platform::Linkedin, id))
    }

    async fn verify_credentials(&self) -> PublishResult<()> {
        self.credentials().map(|_| ())
    }
}
