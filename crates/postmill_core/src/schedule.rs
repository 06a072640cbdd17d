//! Recurring time-of-day schedules.

use crate::{Platform, TimeOfDay, Tone};
use derive_getters::Getters;
use postmill_error::InvalidRequestError;
use serde::{Deserialize, Serialize};

/// Daily schedule that generates and publishes content at fixed times.
///
/// Due-ness is recomputed from the wall clock on every engine run; the
/// schedule itself carries no "last fired" state.
#[derive(
    Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder,
)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct RecurringSchedule {
    /// Stable identifier.
    id: String,

    /// Daily trigger points, ascending once normalized.
    times: Vec<TimeOfDay>,

    /// Platforms to publish to when triggered.
    platforms: Vec<Platform>,

    /// Seed for content generation; empty means pick a default topic.
    #[builder(default)]
    #[serde(default)]
    topic: String,

    /// Tone passed through to generation.
    #[builder(default)]
    #[serde(default)]
    tone: Tone,

    /// Disabled schedules are never evaluated.
    #[builder(default = "true")]
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RecurringSchedule {
    /// Toggle the schedule on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Topic to generate for, or `None` when the default list should be used.
    pub fn topic_seed(&self) -> Option<&str> {
        let topic = self.topic.trim();
        (!topic.is_empty()).then_some(topic)
    }

    /// Sort trigger times and drop repeats.
    ///
    /// The same minute listed twice is a single daily slot.
    pub fn normalized(mut self) -> Self {
        self.times.sort_unstable();
        self.times.dedup();
        self
    }

    /// Check structural requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, no trigger times are set, or
    /// the platform set is empty.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.id.trim().is_empty() {
            return Err(InvalidRequestError::new("Schedule id cannot be empty"));
        }
        if self.times.is_empty() {
            return Err(InvalidRequestError::new(format!(
                "Schedule '{}' has no trigger times",
                self.id
            )));
        }
        if self.platforms.is_empty() {
            return Err(InvalidRequestError::new(format!(
                "Schedule '{}' has no platforms",
                self.id
            )));
        }
        Ok(())
    }
}
