//! Run reports and engine status.

use chrono::{DateTime, Utc};
use postmill_core::{QueuedPost, RecentPostRecord, RecurringSchedule, RunLogEntry, RunStats};
use postmill_social::PlatformOutcome;
use serde::{Deserialize, Serialize};

/// Why an item was processed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RunItemKind {
    /// One-shot queued post
    Queued,
    /// Recurring schedule time slot
    Recurring,
    /// Manual trigger of a schedule
    Manual,
    /// Built-in quick test
    QuickTest,
}

/// Outcome of one processed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunItem {
    /// Queued post id or schedule id
    pub id: String,
    /// Item kind
    pub kind: RunItemKind,
    /// True when at least one platform succeeded
    pub success: bool,
    /// One outcome per platform; empty when generation failed
    pub result: Vec<PlatformOutcome>,
    /// Item-level error, e.g. a generation failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunItem {
    pub(crate) fn from_outcomes(id: String, kind: RunItemKind, result: Vec<PlatformOutcome>) -> Self {
        let success = result.iter().any(|o| *o.success());
        let error = (!success).then(|| {
            result
                .iter()
                .filter_map(|o| o.error().as_ref().map(|e| format!("{}: {}", o.platform(), e)))
                .collect::<Vec<_>>()
                .join("; ")
        });
        Self {
            id,
            kind,
            success,
            result,
            error,
        }
    }

    pub(crate) fn failed(id: String, kind: RunItemKind, error: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            success: false,
            result: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Processed items in processing order
    pub items: Vec<RunItem>,
    /// Items with at least one successful platform
    pub succeeded: usize,
    /// Items with no successful platform
    pub failed: usize,
    /// End of the run; `None` when the run was skipped
    pub last_run: Option<DateTime<Utc>>,
    /// Human-readable summary
    pub message: String,
}

impl RunReport {
    pub(crate) fn new(items: Vec<RunItem>, last_run: DateTime<Utc>) -> Self {
        let succeeded = items.iter().filter(|i| i.success).count();
        let failed = items.len() - succeeded;
        let message = format!(
            "Automation run completed: {}/{} successful",
            succeeded,
            items.len()
        );
        Self {
            items,
            succeeded,
            failed,
            last_run: Some(last_run),
            message,
        }
    }

    pub(crate) fn skipped(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            succeeded: 0,
            failed: 0,
            last_run: None,
            message: message.into(),
        }
    }
}

/// Snapshot of engine state for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Whether scheduled runs are processed
    pub is_active: bool,
    /// Running counters
    pub stats: RunStats,
    /// Log entries, newest first
    pub recent_logs: Vec<RunLogEntry>,
    /// Recent posts, newest first
    pub recent_posts: Vec<RecentPostRecord>,
    /// Recurring schedules
    pub schedules: Vec<RecurringSchedule>,
    /// Queued posts ordered by scheduled time
    pub queued: Vec<QueuedPost>,
}
