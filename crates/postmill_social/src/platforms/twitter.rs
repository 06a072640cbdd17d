//! Twitter publisher.

use crate::config::credential;
use crate::{PublishReceipt, PublishRequest, Publisher, TwitterConfig};
use async_trait::async_trait;
use chrono::Utc;
use postmill_core::Platform;
use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use tracing::{info, instrument};

const MAX_TWEET_CHARS: usize = 280;

/// Validates Twitter credentials and content.
///
/// Requests are not OAuth 1.0a signed, so no call reaches the API; a
/// successful publish returns a simulated receipt with a synthetic
/// `mock_twitter_<millis>` id.
#[derive(Debug, Clone)]
pub struct TwitterPublisher {
    config: TwitterConfig,
}

impl TwitterPublisher {
    /// Create a publisher.
    pub fn new(config: TwitterConfig) -> Self {
        Self { config }
    }

    fn credentials(&self) -> PublishResult<()> {
        let c = &self.config;
        let complete = [&c.api_key, &c.api_secret, &c.access_token, &c.access_token_secret]
            .into_iter()
            .all(|v| credential(v).is_some());
        if complete {
            Ok(())
        } else {
            Err(PublishError::new(PublishErrorKind::MissingCredentials(
                "Twitter API key, API secret, access token and access token secret are required"
                    .to_string(),
            )))
        }
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    #[instrument(skip(self, request), fields(chars = request.content().chars().count()))]
    async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReceipt> {
        self.credentials()?;
        super::require_content(request.content())?;

        let chars = request.content().chars().count();
        if chars > MAX_TWEET_CHARS {
            return Err(PublishError::new(PublishErrorKind::Validation(format!(
                "Tweet exceeds {} characters ({})",
                MAX_TWEET_CHARS, chars
            ))));
        }

        let id = format!("mock_twitter_{}", Utc::now().timestamp_millis());
        info!(post_id = %id, "Twitter post accepted without sending");
        Ok(PublishReceipt::new_simulated(Platform::Twitter, id))
    }

    async fn verify_credentials(&self) -> PublishResult<()> {
        self.credentials()
    }
}
