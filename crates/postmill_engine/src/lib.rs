//! Scheduling and execution engine for Postmill.
//!
//! The [`AutomationEngine`] owns every piece of mutable state: the one-shot
//! [`QueueStore`], the recurring [`ScheduleStore`] and the [`RunRecorder`]
//! holding logs, counters and recent posts. It never starts its own timer;
//! an outer trigger calls [`AutomationEngine::run_once`] on an interval and
//! manual actions call the other operations directly.
//!
//! # Run algorithm
//!
//! 1. Queued pass: every `scheduled` post whose time has arrived within the
//!    queue window is claimed (marked terminal before any I/O), its content is
//!    generated if absent, and it is published to each of its platforms.
//! 2. Recurring pass: every enabled schedule with a time of day within the
//!    recurring window of the current wall clock generates and publishes.
//! 3. All outcomes are folded into a [`RunReport`].
//!
//! Failures are isolated per item and per platform; nothing aborts the run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod engine;
mod queue_store;
mod recorder;
mod report;
mod schedule_store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{AutomationEngine, GenerateAndSchedule};
pub use queue_store::QueueStore;
pub use recorder::RunRecorder;
pub use report::{EngineStatus, RunItem, RunItemKind, RunReport};
pub use schedule_store::ScheduleStore;
