//! Per-platform publisher implementations.

mod facebook;
mod instagram;
mod linkedin;
mod twitter;

pub use facebook::FacebookPublisher;
pub use instagram::InstagramPublisher;
pub use linkedin::LinkedinPublisher;
pub use twitter::TwitterPublisher;

use postmill_error::{PublishError, PublishErrorKind, PublishResult};
use reqwest::Client;
use std::time::Duration;

pub(crate) fn http_client(timeout_seconds: u64) -> PublishResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| {
            PublishError::new(PublishErrorKind::Failed(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })
}

#[track_caller]
pub(crate) fn transport_error(e: reqwest::Error) -> PublishError {
    PublishError::new(PublishErrorKind::Failed(format!("Request failed: {}", e)))
}

#[track_caller]
pub(crate) fn require_content(content: &str) -> PublishResult<()> {
    if content.trim().is_empty() {
        return Err(PublishError::new(PublishErrorKind::Validation(
            "Content is required".to_string(),
        )));
    }
    Ok(())
}
