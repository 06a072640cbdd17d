//! One-shot queued posts.

use crate::{Platform, Tone};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use postmill_error::InvalidRequestError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a queued post.
///
/// `Scheduled` is the only non-terminal state. The legacy label `executed`
/// deserializes to `Published`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueueStatus {
    /// Waiting for its scheduled time
    Scheduled,
    /// A publish attempt has been made; no further action
    #[serde(alias = "executed")]
    #[strum(to_string = "published", serialize = "executed")]
    Published,
}

impl QueueStatus {
    /// Whether no further automatic transition can occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Input for creating a queued post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct NewQueuedPost {
    /// Pre-supplied text; generated from `topic` at execution time when absent.
    #[builder(default)]
    #[serde(default)]
    pub content: Option<String>,
    /// Pre-supplied image reference.
    #[builder(default)]
    #[serde(default)]
    pub image_url: Option<String>,
    /// Platforms to publish to.
    pub platforms: Vec<Platform>,
    /// When the post becomes due.
    pub scheduled_time: DateTime<Utc>,
    /// Generation topic, used only without `content`.
    #[builder(default)]
    #[serde(default)]
    pub topic: Option<String>,
    /// Generation tone, used only without `content`.
    #[builder(default)]
    #[serde(default)]
    pub tone: Option<Tone>,
}

impl NewQueuedPost {
    /// Check structural requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform set is empty.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.platforms.is_empty() {
            return Err(InvalidRequestError::new(
                "A queued post needs at least one platform",
            ));
        }
        Ok(())
    }
}

/// A post scheduled for one-shot publication at a fixed time.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedPost {
    /// Identifier, unique within the process lifetime.
    id: String,
    /// Pre-supplied text.
    content: Option<String>,
    /// Pre-supplied image reference.
    image_url: Option<String>,
    /// Platforms to publish to.
    platforms: Vec<Platform>,
    /// When the post becomes due.
    scheduled_time: DateTime<Utc>,
    /// Generation topic.
    topic: Option<String>,
    /// Generation tone.
    tone: Option<Tone>,
    /// Current lifecycle state.
    status: QueueStatus,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
    /// Set when the post leaves `Scheduled`.
    #[serde(alias = "executedAt")]
    published_at: Option<DateTime<Utc>>,
}

impl QueuedPost {
    /// Materialize a new post in the `Scheduled` state.
    pub fn new(id: impl Into<String>, input: NewQueuedPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: input.content.filter(|c| !c.trim().is_empty()),
            image_url: input.image_url.filter(|u| !u.trim().is_empty()),
            platforms: input.platforms,
            scheduled_time: input.scheduled_time,
            topic: input.topic,
            tone: input.tone,
            status: QueueStatus::Scheduled,
            created_at,
            published_at: None,
        }
    }

    /// Whether the post is due at `now` given a tolerance window.
    ///
    /// Due means `now >= scheduled_time` and `now - scheduled_time <= window`.
    /// Posts that fall out of the window are never due again.
    pub fn is_due(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        self.status == QueueStatus::Scheduled
            && now >= self.scheduled_time
            && now - self.scheduled_time <= window
    }

    /// Set the lifecycle state, stamping `published_at` on the terminal transition.
    pub fn set_status(&mut self, status: QueueStatus, at: DateTime<Utc>) {
        if status.is_terminal() && self.published_at.is_none() {
            self.published_at = Some(at);
        }
        self.status = status;
    }
}
