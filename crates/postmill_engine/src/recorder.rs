//! Run log, counters and recent post history.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use postmill_core::{
    LogLevel, Platform, PostStatus, Provenance, RecentPostRecord, RunLogEntry, RunStats,
};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, warn};

use crate::Clock;

const EXCERPT_CHARS: usize = 100;

/// First characters of a post, for display.
pub(crate) fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}

#[derive(Debug, Default)]
struct Outcomes {
    stats: RunStats,
    recent: VecDeque<RecentPostRecord>,
}

/// Bounded in-memory bookkeeping for engine runs.
///
/// Logs and recent posts are stored most-recent-first; inserting past
/// capacity evicts the oldest entry. Counters only grow. Every log entry is
/// also emitted as a tracing event.
pub struct RunRecorder {
    clock: Arc<dyn Clock>,
    log_capacity: usize,
    recent_capacity: usize,
    next_id: AtomicU64,
    logs: Mutex<VecDeque<RunLogEntry>>,
    outcomes: Mutex<Outcomes>,
}

impl std::fmt::Debug for RunRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRecorder")
            .field("log_capacity", &self.log_capacity)
            .field("recent_capacity", &self.recent_capacity)
            .field("logs", &self.logs.lock().len())
            .finish()
    }
}

impl RunRecorder {
    /// Create a recorder with the given capacities.
    pub fn new(clock: Arc<dyn Clock>, log_capacity: usize, recent_capacity: usize) -> Self {
        Self {
            clock,
            log_capacity,
            recent_capacity,
            next_id: AtomicU64::new(1),
            logs: Mutex::new(VecDeque::with_capacity(log_capacity)),
            outcomes: Mutex::new(Outcomes::default()),
        }
    }

    /// Append a log entry.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, data: Option<JsonValue>) {
        let message = message.into();
        match level {
            LogLevel::Info | LogLevel::Success => {
                info!(log_level = %level, data = ?data, "{}", message)
            }
            LogLevel::Warning => warn!(data = ?data, "{}", message),
            LogLevel::Error => error!(data = ?data, "{}", message),
        }

        let entry = RunLogEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            timestamp: self.clock.now(),
            level,
            message,
            data,
        };

        let mut logs = self.logs.lock();
        logs.push_front(entry);
        logs.truncate(self.log_capacity);
    }

    /// Record one post outcome and update counters.
    pub fn record_outcome(
        &self,
        success: bool,
        platform: Option<Platform>,
        content: &str,
        provenance: Provenance,
    ) {
        let now = self.clock.now();
        let record = RecentPostRecord {
            excerpt: excerpt(content),
            platform,
            timestamp: now,
            status: if success {
                PostStatus::Published
            } else {
                PostStatus::Failed
            },
            provenance,
        };

        let mut outcomes = self.outcomes.lock();
        outcomes.stats.total_posts += 1;
        if success {
            outcomes.stats.successful_posts += 1;
            outcomes.stats.last_post_time = Some(now);
        } else {
            outcomes.stats.failed_posts += 1;
        }
        outcomes.recent.push_front(record);
        let capacity = self.recent_capacity;
        outcomes.recent.truncate(capacity);
    }

    /// Stamp the end of a run.
    pub fn mark_run(&self, at: DateTime<Utc>) {
        self.outcomes.lock().stats.last_run = Some(at);
    }

    /// Counter snapshot.
    pub fn stats(&self) -> RunStats {
        self.outcomes.lock().stats.clone()
    }

    /// Up to `limit` most recent log entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> Vec<RunLogEntry> {
        self.logs.lock().iter().take(limit).cloned().collect()
    }

    /// Recent post records, newest first.
    pub fn recent_posts(&self) -> Vec<RecentPostRecord> {
        self.outcomes.lock().recent.iter().cloned().collect()
    }
}
