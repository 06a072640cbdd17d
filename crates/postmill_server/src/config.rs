//! Layered application configuration.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use postmill_core::RecurringSchedule;
use postmill_engine::EngineConfig;
use postmill_error::{ConfigError, PostmillError, PostmillResult};
use postmill_models::GenerationConfig;
use postmill_social::PlatformsConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../postmill.toml");

const REDACTED: &str = "********";

/// HTTP listener and trigger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Seconds between built-in engine runs; 0 disables the built-in trigger
    #[serde(default = "default_trigger_interval")]
    pub trigger_interval_seconds: u64,
    /// Whether the engine starts active
    #[serde(default)]
    pub start_active: bool,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_trigger_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            trigger_interval_seconds: default_trigger_interval(),
            start_active: false,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_level(),
        }
    }
}

/// Complete Postmill configuration.
///
/// Sources, lowest precedence first:
/// 1. Bundled `postmill.toml` defaults
/// 2. `~/.config/postmill/postmill.toml`
/// 3. `./postmill.toml`
/// 4. An explicit file passed to [`AppConfig::load`]
/// 5. `POSTMILL__SECTION__KEY` environment variables
///
/// Platform credentials still missing afterwards fall back to the plain
/// environment variables (`FB_ACCESS_TOKEN`, `TWITTER_API_KEY`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and trigger
    #[serde(default)]
    pub server: ServerConfig,
    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,
    /// Content generation
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Platform credentials
    #[serde(default)]
    pub platforms: PlatformsConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Recurring schedules seeded at startup
    #[serde(default)]
    pub schedules: Vec<RecurringSchedule>,
}

impl AppConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any source
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> PostmillResult<Self> {
        debug!(?explicit, "Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/postmill/postmill.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("postmill").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("POSTMILL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("generation.models"),
        );

        Self::finish(builder)
    }

    /// Load bundled defaults overlaid with a single file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing or malformed.
    pub fn from_file(path: &Path) -> PostmillResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> PostmillResult<Self> {
        let mut config: Self = builder
            .build()
            .map_err(|e| {
                PostmillError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PostmillError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.platforms = config.platforms.with_env_fallback();
        Ok(config)
    }

    /// Copy with every secret replaced by a mask, safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let secrets = [
            &mut config.generation.api_key,
            &mut config.platforms.facebook.access_token,
            &mut config.platforms.instagram.access_token,
            &mut config.platforms.twitter.api_key,
            &mut config.platforms.twitter.api_secret,
            &mut config.platforms.twitter.access_token,
            &mut config.platforms.twitter.access_token_secret,
            &mut config.platforms.linkedin.access_token,
        ];
        for secret in secrets {
            if secret.is_some() {
                *secret = Some(REDACTED.to_string());
            }
        }
        config
    }

    /// Human-readable warnings about settings that load but will misbehave
    /// or be refused at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let interval = self.server.trigger_interval_seconds;
        let queue_window = self.engine.queue_due_window_minutes;
        let recurring_window = self.engine.recurring_due_window_minutes;

        if let Err(e) = self.engine.validate() {
            warnings.push(e.message);
        }

        if interval == 0 {
            warnings.push(format!(
                "Built-in trigger disabled; an external trigger must call /api/cron/automation at least every {} minute(s)",
                queue_window.max(1)
            ));
        } else {
            let interval = i64::try_from(interval).unwrap_or(i64::MAX);
            if interval > queue_window.saturating_mul(60) {
                warnings.push(format!(
                    "Trigger interval of {}s is coarser than the {} minute queue window; due posts may be skipped",
                    interval, queue_window
                ));
            }
            if interval > recurring_window.saturating_mul(120) {
                warnings.push(format!(
                    "Trigger interval of {}s is coarser than the {} minute recurring window; schedule times may be missed",
                    interval, recurring_window
                ));
            } else if !self.engine.dedup_recurring {
                warnings.push(
                    "Recurring slots fire on every run inside their window; set engine.dedup_recurring = true to fire once per day"
                        .to_string(),
                );
            }
        }

        if self.generation.models.is_empty() {
            warnings.push("No generation models configured; content generation will fail".to_string());
        } else if self.generation.resolved_api_key().is_none() {
            warnings.push(
                "No generation API key (generation.api_key or GEMINI_API_KEY); content generation will fail"
                    .to_string(),
            );
        }

        for platform in self.platforms.missing_credentials() {
            warnings.push(format!(
                "Missing credentials for {}; publishing there will fail",
                platform
            ));
        }

        let mut seen = HashSet::new();
        for schedule in &self.schedules {
            if !seen.insert(schedule.id().as_str()) {
                warnings.push(format!("Duplicate schedule id '{}'", schedule.id()));
            }
            if let Err(e) = schedule.validate() {
                warnings.push(format!("Schedule '{}': {}", schedule.id(), e.message));
            }
        }

        warnings
    }
}
