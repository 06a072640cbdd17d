//! Built-in interval trigger.

use postmill_engine::AutomationEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Call [`AutomationEngine::run_once`] every `interval` until the handle is
/// aborted.
///
/// The first run happens one interval after spawning. A run that overlaps
/// the next tick delays it rather than bursting.
pub fn spawn_interval_trigger(engine: Arc<AutomationEngine>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting interval trigger");
    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval_timer.tick().await;
            let report = engine.run_once().await;
            debug!(
                succeeded = report.succeeded,
                failed = report.failed,
                message = %report.message,
                "Interval run finished"
            );
        }
    })
}
