//! Run log entries, counters and recent-post snapshots shown on the dashboard.

use crate::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Severity of a run log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    /// Informational
    Info,
    /// Something completed successfully
    Success,
    /// Degraded but non-fatal
    Warning,
    /// A failure
    Error,
}

/// One structured entry in the bounded run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    /// Monotonic identifier within the process.
    pub id: u64,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Optional structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

/// Running publication counters.
///
/// Counters only grow; they reset only with the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Every recorded outcome.
    pub total_posts: u64,
    /// Successful outcomes.
    pub successful_posts: u64,
    /// Failed outcomes.
    pub failed_posts: u64,
    /// Time of the last successful publication.
    pub last_post_time: Option<DateTime<Utc>>,
    /// Time of the last engine run.
    pub last_run: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Fraction of successful outcomes, `1.0` when nothing has been recorded.
    pub fn success_rate(&self) -> f64 {
        if self.total_posts == 0 {
            return 1.0;
        }
        self.successful_posts as f64 / self.total_posts as f64
    }
}

/// Why a post was published.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    /// Built-in quick test
    Test,
    /// Manual trigger of a recurring schedule
    Manual,
    /// One-shot queued post
    Scheduled,
    /// Recurring schedule matched the clock
    Recurring,
}

/// Outcome status of a recent post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostStatus {
    /// Published
    Published,
    /// Failed
    Failed,
}

/// Display snapshot of a recent publication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPostRecord {
    /// Leading part of the post text.
    pub excerpt: String,
    /// Target platform, absent when generation failed before dispatch.
    pub platform: Option<Platform>,
    /// When the attempt finished.
    pub timestamp: DateTime<Utc>,
    /// Outcome.
    pub status: PostStatus,
    /// Why the post was made.
    pub provenance: Provenance,
}
