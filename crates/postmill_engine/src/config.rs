//! Engine tuning.

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use postmill_core::{Platform, Tone};
use postmill_error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Widest accepted due window, one day.
pub const MAX_WINDOW_MINUTES: i64 = 24 * 60;

/// Largest accepted distance from UTC.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Engine settings.
///
/// The external trigger must fire at least once per queue window, otherwise
/// a queued post can fall out of its window unobserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct EngineConfig {
    /// Tolerance after a queued post's time during which it is due.
    #[serde(default = "default_queue_window")]
    pub queue_due_window_minutes: i64,

    /// Distance from a recurring time of day within which it is due.
    #[serde(default = "default_recurring_window")]
    pub recurring_due_window_minutes: i64,

    /// Run log ring buffer capacity.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Recent post list capacity.
    #[serde(default = "default_recent_posts_capacity")]
    pub recent_posts_capacity: usize,

    /// Fire each recurring time slot at most once per local date.
    #[serde(default)]
    pub dedup_recurring: bool,

    /// Offset of the schedules' wall clock from UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Platform used by the quick test.
    #[serde(default = "default_quick_test_platform")]
    pub quick_test_platform: Platform,

    /// Topic used by the quick test.
    #[serde(default = "default_quick_test_topic")]
    pub quick_test_topic: String,

    /// Tone used by the quick test.
    #[serde(default)]
    pub quick_test_tone: Tone,
}

fn default_queue_window() -> i64 {
    5
}

fn default_recurring_window() -> i64 {
    10
}

fn default_log_capacity() -> usize {
    100
}

fn default_recent_posts_capacity() -> usize {
    50
}

fn default_quick_test_platform() -> Platform {
    Platform::Facebook
}

fn default_quick_test_topic() -> String {
    "AI development expertise and projects".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_due_window_minutes: default_queue_window(),
            recurring_due_window_minutes: default_recurring_window(),
            log_capacity: default_log_capacity(),
            recent_posts_capacity: default_recent_posts_capacity(),
            dedup_recurring: false,
            utc_offset_minutes: 0,
            quick_test_platform: default_quick_test_platform(),
            quick_test_topic: default_quick_test_topic(),
            quick_test_tone: Tone::default(),
        }
    }
}

impl EngineConfig {
    /// Check that windows and the UTC offset are in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the queue window is outside
    /// `1..=1440`, the recurring window is outside `0..=1440`, or the
    /// offset is a day or more away from UTC.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WINDOW_MINUTES).contains(&self.queue_due_window_minutes) {
            return Err(ConfigError::new(format!(
                "engine.queue_due_window_minutes must be between 1 and {}, got {}",
                MAX_WINDOW_MINUTES, self.queue_due_window_minutes
            )));
        }
        if !(0..=MAX_WINDOW_MINUTES).contains(&self.recurring_due_window_minutes) {
            return Err(ConfigError::new(format!(
                "engine.recurring_due_window_minutes must be between 0 and {}, got {}",
                MAX_WINDOW_MINUTES, self.recurring_due_window_minutes
            )));
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::new(format!(
                "engine.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Queue due window as a duration, clamped to a day either way.
    pub fn queue_window(&self) -> Duration {
        Duration::minutes(
            self.queue_due_window_minutes
                .clamp(-MAX_WINDOW_MINUTES, MAX_WINDOW_MINUTES),
        )
    }

    /// Recurring due window in minutes, clamped to a day either way.
    pub fn recurring_window(&self) -> i64 {
        self.recurring_due_window_minutes
            .clamp(-MAX_WINDOW_MINUTES, MAX_WINDOW_MINUTES)
    }

    /// Wall-clock time in the schedules' timezone.
    ///
    /// An offset that [`validate`](Self::validate) would reject reads as UTC.
    pub fn local_time(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    utc_offset_minutes = self.utc_offset_minutes,
                    "UTC offset out of range, using UTC"
                );
                Utc.fix()
            });
        now.with_timezone(&offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_local_time_applies_offset() {
        let config = EngineConfigBuilder::default()
            .utc_offset_minutes(120)
            .build()
            .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap();
        let local = config.local_time(now);
        assert_eq!((local.hour(), local.minute()), (9, 30));
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = EngineConfigBuilder::default().build().unwrap();
        assert_eq!(built, EngineConfig::default());
        assert_eq!(built.queue_window(), Duration::minutes(5));
        assert!(built.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let huge_window = EngineConfigBuilder::default()
            .queue_due_window_minutes(i64::MAX)
            .build()
            .unwrap();
        assert!(huge_window.validate().is_err());

        let zero_window = EngineConfigBuilder::default()
            .queue_due_window_minutes(0)
            .build()
            .unwrap();
        assert!(zero_window.validate().is_err());

        let negative_recurring = EngineConfigBuilder::default()
            .recurring_due_window_minutes(-1)
            .build()
            .unwrap();
        assert!(negative_recurring.validate().is_err());

        let bad_offset = EngineConfigBuilder::default()
            .utc_offset_minutes(24 * 60)
            .build()
            .unwrap();
        let err = bad_offset.validate().unwrap_err();
        assert!(err.message.contains("utc_offset_minutes"));

        let widest = EngineConfigBuilder::default()
            .queue_due_window_minutes(MAX_WINDOW_MINUTES)
            .recurring_due_window_minutes(0)
            .utc_offset_minutes(-MAX_UTC_OFFSET_MINUTES)
            .build()
            .unwrap();
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_extreme_values_do_not_panic() {
        let config = EngineConfigBuilder::default()
            .queue_due_window_minutes(i64::MAX)
            .recurring_due_window_minutes(i64::MIN)
            .utc_offset_minutes(i32::MAX)
            .build()
            .unwrap();
        assert_eq!(config.queue_window(), Duration::minutes(MAX_WINDOW_MINUTES));
        assert_eq!(config.recurring_window(), -MAX_WINDOW_MINUTES);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap();
        assert_eq!(config.local_time(now).hour(), 7);
    }
}
