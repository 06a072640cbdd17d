//! The automation engine.

use crate::recorder::excerpt;
use crate::{
    Clock, EngineConfig, EngineStatus, QueueStore, RunItem, RunItemKind, RunRecorder, RunReport,
    ScheduleStore, SystemClock,
};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use parking_lot::Mutex;
use postmill_core::{
    LogLevel, NewQueuedPost, Platform, Provenance, QueuedPost, RecurringSchedule, TimeOfDay,
    Tone,
};
use postmill_error::{InvalidRequestError, NotFoundError, PostmillError, PostmillResult};
use postmill_models::{ContentGenerator, ContentRequestBuilder, GeneratedContent};
use postmill_social::PublisherDispatch;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

const QUICK_TEST_ID: &str = "quick-test";

/// Input for generating content now and queueing it for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAndSchedule {
    /// Target platforms; the first one shapes the generated content.
    pub platforms: Vec<Platform>,
    /// Topic seed.
    #[serde(default)]
    pub topic: Option<String>,
    /// Tone label.
    #[serde(default)]
    pub tone: Option<Tone>,
    /// When the queued post becomes due.
    pub scheduled_time: DateTime<Utc>,
}

/// Content ready for dispatch.
struct Prepared {
    content: String,
    image_ref: Option<String>,
}

impl From<GeneratedContent> for Prepared {
    fn from(generated: GeneratedContent) -> Self {
        Self {
            content: generated.text().clone(),
            image_ref: generated.image_ref().clone(),
        }
    }
}

/// Decides what is due, generates, publishes and records outcomes.
///
/// All state lives in the engine instance. Wrap it in an [`Arc`] to share it
/// between the HTTP surface and the interval trigger; every operation takes
/// `&self` and no lock is held across an await point.
pub struct AutomationEngine {
    config: EngineConfig,
    generator: Arc<dyn ContentGenerator>,
    dispatch: PublisherDispatch,
    clock: Arc<dyn Clock>,
    active: AtomicBool,
    queue: QueueStore,
    schedules: ScheduleStore,
    recorder: RunRecorder,
    fired: Mutex<HashMap<(String, TimeOfDay), NaiveDate>>,
}

impl std::fmt::Debug for AutomationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationEngine")
            .field("config", &self.config)
            .field("dispatch", &self.dispatch)
            .field("active", &self.is_active())
            .field("queue", &self.queue.len())
            .finish()
    }
}

impl AutomationEngine {
    /// Create an engine on the system clock, initially inactive.
    pub fn new(
        config: EngineConfig,
        generator: Arc<dyn ContentGenerator>,
        dispatch: PublisherDispatch,
    ) -> Self {
        Self::with_clock(config, generator, dispatch, Arc::new(SystemClock))
    }

    /// Create an engine on an explicit clock.
    pub fn with_clock(
        config: EngineConfig,
        generator: Arc<dyn ContentGenerator>,
        dispatch: PublisherDispatch,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let recorder = RunRecorder::new(
            clock.clone(),
            config.log_capacity,
            config.recent_posts_capacity,
        );
        Self {
            config,
            generator,
            dispatch,
            clock,
            active: AtomicBool::new(false),
            queue: QueueStore::new(),
            schedules: ScheduleStore::new(),
            recorder,
            fired: Mutex::new(HashMap::new()),
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One-shot post queue.
    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    /// Recurring schedules.
    pub fn schedules(&self) -> &ScheduleStore {
        &self.schedules
    }

    /// Logs, counters and recent posts.
    pub fn recorder(&self) -> &RunRecorder {
        &self.recorder
    }

    /// Current time on the engine clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Resume scheduled processing.
    pub fn start(&self) {
        if !self.active.swap(true, Ordering::SeqCst) {
            self.recorder
                .log(LogLevel::Success, "Automation started", None);
        }
    }

    /// Pause scheduled processing.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.recorder
                .log(LogLevel::Warning, "Automation stopped", None);
        }
    }

    /// Whether scheduled runs are processed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Replace all recurring schedules.
    ///
    /// # Errors
    ///
    /// Returns a validation error and leaves the schedules unchanged if any
    /// entry is malformed.
    pub fn update_schedules(&self, schedules: Vec<RecurringSchedule>) -> PostmillResult<()> {
        let count = schedules.len();
        self.schedules.replace_all(schedules)?;
        let kept = self.schedules.list();
        self.fired
            .lock()
            .retain(|(id, _), _| kept.iter().any(|s| s.id() == id));
        self.recorder.log(
            LogLevel::Info,
            format!("Schedules updated: {} schedule(s)", count),
            None,
        );
        Ok(())
    }

    /// Enable or disable one schedule.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id.
    pub fn set_schedule_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> PostmillResult<RecurringSchedule> {
        let schedule = self.schedules.set_enabled(id, enabled)?;
        self.recorder.log(
            LogLevel::Info,
            format!(
                "Schedule {} {}",
                id,
                if enabled { "enabled" } else { "disabled" }
            ),
            None,
        );
        Ok(schedule)
    }

    /// Queue a one-shot post.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] when the post has no platforms.
    pub fn create_post(&self, input: NewQueuedPost) -> PostmillResult<QueuedPost> {
        let post = self.queue.create(input, self.clock.now())?;
        self.recorder.log(
            LogLevel::Info,
            format!("Post {} scheduled for {}", post.id(), post.scheduled_time()),
            None,
        );
        Ok(post)
    }

    /// Run both passes at the current time.
    pub async fn run_once(&self) -> RunReport {
        self.run_once_at(self.clock.now()).await
    }

    /// Run both passes as if the time were `now`.
    ///
    /// A paused engine logs a warning and returns an empty report without
    /// touching any store.
    #[instrument(skip(self), fields(active = self.is_active()))]
    pub async fn run_once_at(&self, now: DateTime<Utc>) -> RunReport {
        if !self.is_active() {
            let message = "Automation is paused; run skipped";
            self.recorder.log(LogLevel::Warning, message, None);
            return RunReport::skipped(message);
        }

        self.recorder.log(
            LogLevel::Info,
            "Starting automation run",
            Some(json!({ "time": now })),
        );

        let mut items = self.queued_pass(now).await;
        items.extend(self.recurring_pass(now).await);
        self.finish_run(items, now)
    }

    /// Run the queued pass only at the current time.
    pub async fn execute_queued(&self) -> RunReport {
        self.execute_queued_at(self.clock.now()).await
    }

    /// Run the queued pass only, as if the time were `now`.
    ///
    /// Queued posts are explicit user requests, so this path ignores the
    /// active flag.
    #[instrument(skip(self))]
    pub async fn execute_queued_at(&self, now: DateTime<Utc>) -> RunReport {
        let items = self.queued_pass(now).await;
        self.finish_run(items, now)
    }

    /// Fire one schedule immediately, regardless of time, active flag or
    /// enabled state.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id. Generation and publish
    /// failures are reported in the returned item.
    #[instrument(skip(self))]
    pub async fn trigger_one(&self, schedule_id: &str) -> PostmillResult<RunItem> {
        let schedule = self
            .schedules
            .get(schedule_id)
            .ok_or_else(|| NotFoundError::new("schedule", schedule_id))?;
        self.recorder.log(
            LogLevel::Info,
            format!("Manually triggering schedule {}", schedule_id),
            None,
        );
        Ok(self
            .execute_schedule(&schedule, RunItemKind::Manual, Provenance::Manual)
            .await)
    }

    /// Generate and publish with the built-in quick test settings.
    #[instrument(skip(self))]
    pub async fn quick_test(&self) -> RunItem {
        let platforms = [self.config.quick_test_platform];
        self.recorder.log(
            LogLevel::Info,
            format!("Running quick test on {}", self.config.quick_test_platform),
            None,
        );

        let generated = self
            .generate_for(
                &platforms,
                Some(self.config.quick_test_topic.as_str()),
                Some(self.config.quick_test_tone),
            )
            .await;
        match generated {
            Ok(generated) => {
                self.publish_item(
                    QUICK_TEST_ID.to_string(),
                    RunItemKind::QuickTest,
                    Provenance::Test,
                    &platforms,
                    generated.into(),
                )
                .await
            }
            Err(e) => self.generation_failed(
                QUICK_TEST_ID,
                RunItemKind::QuickTest,
                Provenance::Test,
                &self.config.quick_test_topic,
                &e,
            ),
        }
    }

    /// Generate content now and queue it for `scheduled_time`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] for an empty platform list, or the
    /// generation error. Nothing is queued on failure.
    #[instrument(skip(self, request), fields(platforms = request.platforms.len()))]
    pub async fn generate_and_schedule(
        &self,
        request: GenerateAndSchedule,
    ) -> PostmillResult<QueuedPost> {
        let generated = self
            .generate_for(&request.platforms, request.topic.as_deref(), request.tone)
            .await?;

        let input = NewQueuedPost {
            content: Some(generated.text().clone()),
            image_url: generated.image_ref().clone(),
            platforms: request.platforms,
            scheduled_time: request.scheduled_time,
            topic: request.topic,
            tone: request.tone,
        };
        let post = self.queue.create(input, self.clock.now())?;
        self.recorder.log(
            LogLevel::Success,
            format!(
                "Generated and scheduled post {} for {}",
                post.id(),
                post.scheduled_time()
            ),
            None,
        );
        Ok(post)
    }

    /// Snapshot for the dashboard.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            is_active: self.is_active(),
            stats: self.recorder.stats(),
            recent_logs: self.recorder.recent_logs(self.config.log_capacity),
            recent_posts: self.recorder.recent_posts(),
            schedules: self.schedules.list(),
            queued: self.queue.list(),
        }
    }

    fn finish_run(&self, items: Vec<RunItem>, now: DateTime<Utc>) -> RunReport {
        self.recorder.mark_run(now);
        let report = RunReport::new(items, now);
        let level = if report.failed == 0 {
            LogLevel::Success
        } else {
            LogLevel::Warning
        };
        self.recorder.log(
            level,
            report.message.clone(),
            Some(json!({ "succeeded": report.succeeded, "total": report.items.len() })),
        );
        report
    }

    async fn queued_pass(&self, now: DateTime<Utc>) -> Vec<RunItem> {
        let due = self.queue.claim_due(now, self.config.queue_window());
        if due.is_empty() {
            debug!("No queued posts due");
            return Vec::new();
        }

        self.recorder.log(
            LogLevel::Info,
            format!("Found {} queued post(s) due", due.len()),
            None,
        );
        let mut items = Vec::with_capacity(due.len());
        for post in &due {
            items.push(self.execute_post(post).await);
        }
        items
    }

    async fn execute_post(&self, post: &QueuedPost) -> RunItem {
        let prepared = match post.content() {
            Some(content) => Prepared {
                content: content.clone(),
                image_ref: post.image_url().clone(),
            },
            None => {
                let generated = self
                    .generate_for(post.platforms(), post.topic().as_deref(), *post.tone())
                    .await;
                match generated {
                    Ok(generated) => Prepared {
                        content: generated.text().clone(),
                        image_ref: post
                            .image_url()
                            .clone()
                            .or_else(|| generated.image_ref().clone()),
                    },
                    Err(e) => {
                        return self.generation_failed(
                            post.id(),
                            RunItemKind::Queued,
                            Provenance::Scheduled,
                            post.topic().as_deref().unwrap_or_default(),
                            &e,
                        );
                    }
                }
            }
        };

        self.publish_item(
            post.id().clone(),
            RunItemKind::Queued,
            Provenance::Scheduled,
            post.platforms(),
            prepared,
        )
        .await
    }

    async fn recurring_pass(&self, now: DateTime<Utc>) -> Vec<RunItem> {
        let local = self.config.local_time(now);
        let now_minutes = i64::from(local.hour() * 60 + local.minute());
        let today = local.date_naive();
        let window = self.config.recurring_window();

        let mut items = Vec::new();
        for schedule in self.schedules.enabled() {
            let due_slot = schedule
                .times()
                .iter()
                .copied()
                .find(|t| (now_minutes - i64::from(t.minutes_of_day())).abs() <= window);
            let Some(slot) = due_slot else {
                continue;
            };

            if self.config.dedup_recurring && !self.claim_slot(schedule.id(), slot, today) {
                debug!(schedule = %schedule.id(), %slot, "Slot already fired today");
                continue;
            }

            self.recorder.log(
                LogLevel::Info,
                format!("Schedule {} due for {}", schedule.id(), slot),
                None,
            );
            items.push(
                self.execute_schedule(&schedule, RunItemKind::Recurring, Provenance::Recurring)
                    .await,
            );
        }
        items
    }

    /// Record a slot as fired for `date`; false if it already was.
    fn claim_slot(&self, schedule_id: &str, slot: TimeOfDay, date: NaiveDate) -> bool {
        let mut fired = self.fired.lock();
        let key = (schedule_id.to_string(), slot);
        if fired.get(&key) == Some(&date) {
            return false;
        }
        fired.insert(key, date);
        true
    }

    async fn execute_schedule(
        &self,
        schedule: &RecurringSchedule,
        kind: RunItemKind,
        provenance: Provenance,
    ) -> RunItem {
        let generated = self
            .generate_for(
                schedule.platforms(),
                schedule.topic_seed(),
                Some(*schedule.tone()),
            )
            .await;
        match generated {
            Ok(generated) => {
                self.publish_item(
                    schedule.id().clone(),
                    kind,
                    provenance,
                    schedule.platforms(),
                    generated.into(),
                )
                .await
            }
            Err(e) => {
                self.generation_failed(schedule.id(), kind, provenance, schedule.topic(), &e)
            }
        }
    }

    async fn generate_for(
        &self,
        platforms: &[Platform],
        topic: Option<&str>,
        tone: Option<Tone>,
    ) -> PostmillResult<GeneratedContent> {
        let platform = platforms
            .first()
            .copied()
            .ok_or_else(|| InvalidRequestError::new("At least one platform is required"))?;
        let request = ContentRequestBuilder::default()
            .platform(platform)
            .topic(topic.map(str::to_string))
            .tone(tone)
            .generate_image(platforms.iter().any(|p| p.requires_image()))
            .build()
            .map_err(|e| InvalidRequestError::new(e.to_string()))?;
        Ok(self.generator.generate(&request).await?)
    }

    fn generation_failed(
        &self,
        id: &str,
        kind: RunItemKind,
        provenance: Provenance,
        topic: &str,
        error: &PostmillError,
    ) -> RunItem {
        let message = error.message();
        self.recorder.log(
            LogLevel::Error,
            format!("Content generation failed for {}: {}", id, message),
            Some(json!({ "id": id, "kind": kind })),
        );
        self.recorder.record_outcome(false, None, topic, provenance);
        RunItem::failed(id.to_string(), kind, message)
    }

    async fn publish_item(
        &self,
        id: String,
        kind: RunItemKind,
        provenance: Provenance,
        platforms: &[Platform],
        prepared: Prepared,
    ) -> RunItem {
        let outcomes = self
            .dispatch
            .publish_all(platforms, &prepared.content, prepared.image_ref.as_deref())
            .await;

        for outcome in &outcomes {
            let platform = *outcome.platform();
            self.recorder.record_outcome(
                *outcome.success(),
                Some(platform),
                &prepared.content,
                provenance,
            );
            if *outcome.simulated() {
                self.recorder.log(
                    LogLevel::Warning,
                    format!("Simulated post to {} ({}); nothing was sent", platform, id),
                    Some(json!({ "postId": outcome.external_post_id() })),
                );
            } else if *outcome.success() {
                self.recorder.log(
                    LogLevel::Success,
                    format!("Posted to {} ({})", platform, id),
                    Some(json!({
                        "postId": outcome.external_post_id(),
                        "excerpt": excerpt(&prepared.content),
                    })),
                );
            } else {
                self.recorder.log(
                    LogLevel::Error,
                    format!(
                        "Failed to post to {} ({}): {}",
                        platform,
                        id,
                        outcome.error().as_deref().unwrap_or("unknown error")
                    ),
                    Some(json!({ "category": outcome.category() })),
                );
            }
        }

        RunItem::from_outcomes(id, kind, outcomes)
    }
}
