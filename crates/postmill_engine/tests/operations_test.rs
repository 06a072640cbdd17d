//! Manual operations, status snapshots and the default-topic scenario.

mod test_utils;

use chrono::Duration;
use postmill_core::{
    NewQueuedPostBuilder, Platform, Provenance, QueueStatus, RecurringScheduleBuilder, TimeOfDay,
    Tone,
};
use postmill_engine::{
    AutomationEngine, EngineConfig, EngineConfigBuilder, FixedClock, GenerateAndSchedule,
    RunItemKind,
};
use postmill_error::PostmillErrorKind;
use postmill_models::{ContentClient, DEFAULT_TOPICS};
use postmill_social::PublisherDispatch;
use std::sync::Arc;
use test_utils::{Harness, MockGenerator, MockPublisher, RecordingModel, at};

fn schedule(id: &str, platforms: Vec<Platform>) -> postmill_core::RecurringSchedule {
    RecurringScheduleBuilder::default()
        .id(id)
        .times(vec![TimeOfDay::from_hm(18, 30).expect("Valid time")])
        .platforms(platforms)
        .topic("Rust at work")
        .tone(Tone::Casual)
        .build()
        .expect("Valid schedule")
}

#[tokio::test]
async fn test_empty_topic_schedule_uses_default_topic() -> anyhow::Result<()> {
    let model = Arc::new(RecordingModel::default());
    let generator = Arc::new(ContentClient::new(vec![model.clone()]));
    let facebook = Arc::new(MockPublisher::new(Platform::Facebook));
    let dispatch = PublisherDispatch::new().with(facebook.clone());
    let clock = Arc::new(FixedClock::new(at(9, 3)));
    let engine = AutomationEngine::with_clock(EngineConfig::default(), generator, dispatch, clock);

    engine.start();
    engine.update_schedules(vec![
        RecurringScheduleBuilder::default()
            .id("morning")
            .times(vec![TimeOfDay::from_hm(9, 0).expect("Valid time")])
            .platforms(vec![Platform::Facebook])
            .topic("")
            .tone(Tone::Professional)
            .enabled(true)
            .build()?,
    ])?;

    let report = engine.run_once().await;

    assert_eq!(report.items.len(), 1);
    assert!(report.items[0].success);
    assert_eq!(report.items[0].id, "morning");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(
        DEFAULT_TOPICS
            .iter()
            .any(|topic| prompts[0].contains(&format!("Topic: {topic}")))
    );
    assert_eq!(
        facebook.contents(),
        vec!["Fresh post from the recording model\n\n#rust"]
    );
    Ok(())
}

#[tokio::test]
async fn test_trigger_one_bypasses_time_and_pause() -> anyhow::Result<()> {
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), at(3, 0));
    h.engine
        .update_schedules(vec![schedule("evening", vec![Platform::Linkedin])])?;
    h.engine.set_schedule_enabled("evening", false)?;

    let item = h.engine.trigger_one("evening").await?;

    assert_eq!(item.kind, RunItemKind::Manual);
    assert!(item.success);
    assert_eq!(h.publisher(Platform::Linkedin).calls(), 1);
    assert_eq!(
        h.generator.requests()[0].topic().as_deref(),
        Some("Rust at work")
    );
    assert_eq!(h.engine.recorder().recent_posts()[0].provenance, Provenance::Manual);
    Ok(())
}

#[tokio::test]
async fn test_trigger_unknown_schedule_is_not_found() {
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), at(3, 0));
    let err = h.engine.trigger_one("ghost").await.unwrap_err();
    assert!(matches!(err.kind(), PostmillErrorKind::NotFound(_)));
    assert_eq!(h.engine.recorder().stats().total_posts, 0);
}

#[tokio::test]
async fn test_quick_test_uses_configured_defaults() -> anyhow::Result<()> {
    let config = EngineConfigBuilder::default()
        .quick_test_platform(Platform::Twitter)
        .quick_test_topic("Quick topic")
        .build()?;
    let h = Harness::new(config, MockGenerator::new(), at(3, 0));

    let item = h.engine.quick_test().await;

    assert_eq!(item.kind, RunItemKind::QuickTest);
    assert!(item.success);
    assert_eq!(h.publisher(Platform::Twitter).contents(), vec!["Post about Quick topic"]);
    assert_eq!(h.engine.recorder().recent_posts()[0].provenance, Provenance::Test);
    Ok(())
}

#[tokio::test]
async fn test_quick_test_generation_failure_counts_one_failed_post() {
    let h = Harness::new(EngineConfig::default(), MockGenerator::failing(), at(3, 0));

    let item = h.engine.quick_test().await;

    assert!(!item.success);
    assert!(item.result.is_empty());
    assert_eq!(h.total_publish_calls(), 0);
    let stats = h.engine.recorder().stats();
    assert_eq!((stats.total_posts, stats.failed_posts), (1, 1));
}

#[tokio::test]
async fn test_generate_and_schedule_queues_generated_content() -> anyhow::Result<()> {
    let now = at(8, 0);
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), now);

    let post = h
        .engine
        .generate_and_schedule(GenerateAndSchedule {
            platforms: vec![Platform::Linkedin, Platform::Facebook],
            topic: Some("Hiring".to_string()),
            tone: Some(Tone::Engaging),
            scheduled_time: now + Duration::hours(1),
        })
        .await?;

    assert_eq!(post.content().as_deref(), Some("Post about Hiring"));
    assert_eq!(*post.status(), QueueStatus::Scheduled);
    assert_eq!(*h.generator.requests()[0].platform(), Platform::Linkedin);
    assert_eq!(h.engine.queue().len(), 1);
    assert_eq!(h.total_publish_calls(), 0);

    // Executes once its time arrives, without generating again.
    h.engine.start();
    h.clock.advance(Duration::hours(1));
    let report = h.engine.run_once().await;
    assert_eq!(report.items.len(), 1);
    assert_eq!(h.generator.calls(), 1);
    assert_eq!(h.publisher(Platform::Facebook).calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_generate_and_schedule_rejects_empty_platforms() {
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), at(8, 0));
    let err = h
        .engine
        .generate_and_schedule(GenerateAndSchedule {
            platforms: Vec::new(),
            topic: None,
            tone: None,
            scheduled_time: at(9, 0),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), PostmillErrorKind::InvalidRequest(_)));
    assert!(h.engine.queue().is_empty());
}

#[tokio::test]
async fn test_generate_and_schedule_failure_queues_nothing() {
    let h = Harness::new(EngineConfig::default(), MockGenerator::failing(), at(8, 0));
    let err = h
        .engine
        .generate_and_schedule(GenerateAndSchedule {
            platforms: vec![Platform::Facebook],
            topic: None,
            tone: None,
            scheduled_time: at(9, 0),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), PostmillErrorKind::Generation(_)));
    assert!(h.engine.queue().is_empty());
}

#[tokio::test]
async fn test_execute_queued_ignores_schedules_and_pause() -> anyhow::Result<()> {
    let now = at(18, 30);
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), now);
    h.engine
        .update_schedules(vec![schedule("evening", vec![Platform::Linkedin])])?;
    h.engine.create_post(
        NewQueuedPostBuilder::default()
            .content(Some("Queued".to_string()))
            .platforms(vec![Platform::Facebook])
            .scheduled_time(now)
            .build()?,
    )?;

    let report = h.engine.execute_queued().await;

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].kind, RunItemKind::Queued);
    assert_eq!(h.publisher(Platform::Linkedin).calls(), 0);
    assert_eq!(h.engine.recorder().stats().last_run, Some(now));
    Ok(())
}

#[tokio::test]
async fn test_status_snapshot() -> anyhow::Result<()> {
    let now = at(12, 0);
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), now);
    h.engine.start();
    h.engine
        .update_schedules(vec![schedule("evening", vec![Platform::Twitter])])?;
    h.engine.create_post(
        NewQueuedPostBuilder::default()
            .content(Some("Later".to_string()))
            .platforms(vec![Platform::Facebook])
            .scheduled_time(now + Duration::days(1))
            .build()?,
    )?;

    let status = h.engine.status();

    assert!(status.is_active);
    assert_eq!(status.schedules.len(), 1);
    assert_eq!(status.queued.len(), 1);
    assert!(!status.recent_logs.is_empty());

    let json = serde_json::to_value(&status)?;
    assert_eq!(json["isActive"], true);
    assert!(json["stats"]["totalPosts"].is_number());
    assert!(json["recentLogs"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_stop_pauses_runs() -> anyhow::Result<()> {
    let h = Harness::new(EngineConfig::default(), MockGenerator::new(), at(18, 30));
    h.engine
        .update_schedules(vec![schedule("evening", vec![Platform::Twitter])])?;
    h.engine.start();
    assert!(h.engine.is_active());
    h.engine.stop();
    assert!(!h.engine.is_active());

    let report = h.engine.run_once().await;
    assert!(report.items.is_empty());
    assert_eq!(h.total_publish_calls(), 0);
    Ok(())
}
