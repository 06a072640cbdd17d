//! Wiring configuration into a running engine and server.

use crate::{ApiState, AppConfig, create_router, spawn_interval_trigger};
use postmill_engine::AutomationEngine;
use postmill_error::{ConfigError, GenerationErrorKind, HttpError, PostmillResult};
use postmill_models::{ContentClient, ContentGenerator};
use postmill_social::PublisherDispatch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Build the engine described by `config`.
///
/// A missing generation API key is not fatal: posts with pre-supplied
/// content still publish, and every generation attempt reports the missing
/// models.
///
/// # Errors
///
/// Returns an error if the engine windows or UTC offset are out of range,
/// an HTTP client cannot be built, or a seeded schedule is invalid.
pub fn build_engine(config: &AppConfig) -> PostmillResult<Arc<AutomationEngine>> {
    config.engine.validate()?;

    let generator: Arc<dyn ContentGenerator> = match ContentClient::gemini(&config.generation) {
        Ok(client) => {
            info!(models = ?client.models(), "Content generation ready");
            Arc::new(client)
        }
        Err(e) if e.kind == GenerationErrorKind::MissingApiKey => {
            warn!("No generation API key configured; content generation is disabled");
            Arc::new(ContentClient::new(Vec::new()))
        }
        Err(e) => return Err(e.into()),
    };

    let dispatch = PublisherDispatch::from_config(&config.platforms)?;
    let engine = AutomationEngine::new(config.engine.clone(), generator, dispatch);

    if !config.schedules.is_empty() {
        engine.update_schedules(config.schedules.clone()).map_err(|e| {
            ConfigError::new(format!("Invalid [[schedules]] entry: {}", e.message()))
        })?;
    }
    if config.server.start_active {
        engine.start();
    }

    Ok(Arc::new(engine))
}

/// Serve the HTTP API until Ctrl-C, running the interval trigger alongside.
///
/// # Errors
///
/// Returns [`HttpError`] if the listener cannot bind or the server fails.
pub async fn serve(config: &AppConfig, engine: Arc<AutomationEngine>) -> PostmillResult<()> {
    let trigger = (config.server.trigger_interval_seconds > 0).then(|| {
        spawn_interval_trigger(
            engine.clone(),
            Duration::from_secs(config.server.trigger_interval_seconds),
        )
    });

    let state = ApiState::new(engine).with_graph_base_url(config.platforms.facebook.base_url.clone());
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {}: {}", config.server.bind, e)))?;
    info!(bind = %config.server.bind, "Postmill listening");

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HttpError::new(format!("Server error: {}", e)));

    if let Some(handle) = trigger {
        handle.abort();
    }
    info!("Postmill stopped");
    Ok(result?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = ?e, "Failed to listen for shutdown signal");
    }
}
