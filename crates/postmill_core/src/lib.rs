//! Core data types for the Postmill content automation engine.
//!
//! This crate provides the entities shared by the generation client, the
//! platform publishers and the automation engine: platform and tone
//! enumerations, recurring schedules, one-shot queued posts, and the
//! run log / stats records the dashboard displays.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod platform;
mod queue;
mod record;
mod schedule;
mod time_of_day;
mod tone;

pub use platform::Platform;
pub use queue::{NewQueuedPost, NewQueuedPostBuilder, QueueStatus, QueuedPost};
pub use record::{LogLevel, PostStatus, Provenance, RecentPostRecord, RunLogEntry, RunStats};
pub use schedule::{RecurringSchedule, RecurringScheduleBuilder};
pub use time_of_day::TimeOfDay;
pub use tone::{ContentType, Tone};
