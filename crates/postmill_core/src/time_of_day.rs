//! Wall-clock time of day without a date.

use chrono::{NaiveTime, Timelike};
use postmill_error::InvalidRequestError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Hour and minute of a daily trigger point, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{:02}:{:02}", _0.hour(), _0.minute())]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Create a time of day from hour and minute.
    ///
    /// Returns `None` when either component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Underlying chrono time.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        // Seconds are not part of a trigger point.
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|e| InvalidRequestError::new(format!("Invalid time of day '{}': {}", s, e)))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
