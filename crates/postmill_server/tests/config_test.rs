//! Configuration loading and validation tests.

use postmill_core::Platform;
use postmill_server::{AppConfig, build_engine};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_bundled_defaults() -> anyhow::Result<()> {
    let file = config_file("")?;
    let config = AppConfig::from_file(file.path())?;

    assert_eq!(config.server.bind, "127.0.0.1:3000");
    assert_eq!(config.server.trigger_interval_seconds, 60);
    assert!(!config.server.start_active);
    assert_eq!(config.engine.queue_due_window_minutes, 5);
    assert_eq!(config.engine.recurring_due_window_minutes, 10);
    assert_eq!(config.engine.log_capacity, 100);
    assert!(!config.engine.dedup_recurring);
    assert_eq!(config.engine.quick_test_platform, Platform::Facebook);
    assert_eq!(
        config.generation.models,
        vec!["gemini-2.5-pro", "gemini-2.5-flash", "gemini-2.5-flash-lite"]
    );
    assert_eq!(
        config.platforms.facebook.base_url,
        "https://graph.facebook.com/v23.0"
    );
    assert_eq!(config.logging.level, "info");
    assert!(config.schedules.is_empty());
    Ok(())
}

#[test]
fn test_file_overrides_defaults() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[server]
bind = "0.0.0.0:8080"
trigger_interval_seconds = 30

[engine]
dedup_recurring = true
utc_offset_minutes = -300

[generation]
models = ["gemini-2.5-flash"]

[[schedules]]
id = "morning"
times = ["09:00", "17:30"]
platforms = ["facebook", "linkedin"]
topic = "rust"
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.server.trigger_interval_seconds, 30);
    assert!(config.engine.dedup_recurring);
    assert_eq!(config.engine.utc_offset_minutes, -300);
    // Untouched keys keep their defaults.
    assert_eq!(config.engine.queue_due_window_minutes, 5);
    assert_eq!(config.generation.models, vec!["gemini-2.5-flash"]);

    assert_eq!(config.schedules.len(), 1);
    let schedule = &config.schedules[0];
    assert_eq!(schedule.id(), "morning");
    assert_eq!(schedule.times().len(), 2);
    assert_eq!(schedule.platforms(), &vec![Platform::Facebook, Platform::Linkedin]);
    assert!(*schedule.enabled());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let result = AppConfig::from_file(std::path::Path::new("/nonexistent/postmill.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_value_is_an_error() -> anyhow::Result<()> {
    let file = config_file("[server]\ntrigger_interval_seconds = \"soon\"\n")?;
    assert!(AppConfig::from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_validate_flags_coarse_trigger() -> anyhow::Result<()> {
    let file = config_file("[server]\ntrigger_interval_seconds = 600\n")?;
    let config = AppConfig::from_file(file.path())?;
    let warnings = config.validate();
    assert!(
        warnings.iter().any(|w| w.contains("queue window")),
        "{:?}",
        warnings
    );
    Ok(())
}

#[test]
fn test_validate_flags_disabled_trigger() -> anyhow::Result<()> {
    let file = config_file("[server]\ntrigger_interval_seconds = 0\n")?;
    let config = AppConfig::from_file(file.path())?;
    assert!(
        config
            .validate()
            .iter()
            .any(|w| w.contains("/api/cron/automation"))
    );
    Ok(())
}

#[test]
fn test_validate_accepts_configured_platform() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[platforms.facebook]
page_id = "123"
access_token = "token"
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    let warnings = config.validate();
    assert!(!warnings.iter().any(|w| w.contains("for facebook")), "{:?}", warnings);
    Ok(())
}

#[test]
fn test_validate_flags_bad_schedule() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[[schedules]]
id = "empty"
times = ["09:00"]
platforms = []
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    assert!(config.validate().iter().any(|w| w.contains("Schedule 'empty'")));
    assert!(build_engine(&config).is_err());
    Ok(())
}

#[test]
fn test_duplicate_schedule_ids_refused() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[[schedules]]
id = "daily"
times = ["09:00"]
platforms = ["facebook"]

[[schedules]]
id = "daily"
times = ["18:00"]
platforms = ["twitter"]
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    assert!(config.validate().iter().any(|w| w.contains("Duplicate schedule id 'daily'")));
    let err = build_engine(&config).unwrap_err();
    assert!(err.message().contains("Duplicate schedule id 'daily'"));
    Ok(())
}

#[test]
fn test_out_of_range_engine_settings_refused() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[engine]
queue_due_window_minutes = 9223372036854775807
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    assert!(config.validate().iter().any(|w| w.contains("queue_due_window_minutes")));
    assert!(build_engine(&config).is_err());

    let file = config_file(
        r#"
[engine]
utc_offset_minutes = 1440
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    assert!(config.validate().iter().any(|w| w.contains("utc_offset_minutes")));
    assert!(build_engine(&config).is_err());
    Ok(())
}

#[test]
fn test_redacted_masks_secrets() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[generation]
api_key = "sk-secret"

[platforms.facebook]
page_id = "123"
access_token = "fb-secret"
"#,
    )?;
    let config = AppConfig::from_file(file.path())?.redacted();
    let rendered = toml::to_string_pretty(&config)?;
    assert!(!rendered.contains("sk-secret"));
    assert!(!rendered.contains("fb-secret"));
    assert!(rendered.contains("123"));
    Ok(())
}

#[tokio::test]
async fn test_build_engine_seeds_schedules() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[server]
start_active = true

[[schedules]]
id = "evening"
times = ["18:00"]
platforms = ["twitter"]
"#,
    )?;
    let config = AppConfig::from_file(file.path())?;
    let engine = build_engine(&config)?;
    assert!(engine.is_active());
    assert_eq!(engine.schedules().list().len(), 1);
    Ok(())
}
