//! HTTP API over the automation engine.

use crate::error::{ApiError, bad_body};
use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use postmill_core::{NewQueuedPost, Platform, QueueStatus, RecurringSchedule};
use postmill_engine::{AutomationEngine, GenerateAndSchedule, RunReport};
use postmill_error::InvalidRequestError;
use postmill_social::TokenValidation;
use serde::Deserialize;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

type ApiResult = Result<Json<Value>, ApiError>;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    engine: Arc<AutomationEngine>,
    graph_base_url: Option<String>,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(engine: Arc<AutomationEngine>) -> Self {
        Self {
            engine,
            graph_base_url: None,
        }
    }

    /// Graph API base used by token validation.
    pub fn with_graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = Some(url.into());
        self
    }
}

/// Creates the API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/automation",
            get(automation_status).post(automation_action),
        )
        .route(
            "/api/cron/automation",
            get(cron_automation).post(cron_automation),
        )
        .route("/api/cron/execute-scheduled", get(cron_execute_scheduled))
        .route(
            "/api/scheduler",
            get(list_posts)
                .post(create_post)
                .delete(delete_post)
                .patch(update_post),
        )
        .route("/api/validate-token", get(validate_token))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn automation_status(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.engine.status()))
}

/// Dashboard actions on `POST /api/automation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
enum AutomationAction {
    Start,
    Stop,
    UpdateSchedules,
    ToggleSchedule,
    RunAutomation,
    TriggerSchedule,
    QuickTest,
    GenerateAndSchedule,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutomationRequest {
    action: String,
    #[serde(default)]
    schedules: Option<Vec<RecurringSchedule>>,
    #[serde(default)]
    schedule_id: Option<String>,
    #[serde(default)]
    config: Option<GenerateAndSchedule>,
    #[serde(default)]
    enabled: Option<bool>,
}

#[instrument(skip_all)]
async fn automation_action(
    State(state): State<ApiState>,
    payload: Result<Json<AutomationRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload.map_err(bad_body)?;
    let action = AutomationAction::from_str(&request.action)
        .map_err(|_| InvalidRequestError::new("Invalid action"))?;
    info!(%action, "Automation action");

    let engine = &state.engine;
    let body = match action {
        AutomationAction::Start => {
            engine.start();
            json!({
                "success": true,
                "message": "Automation started successfully",
                "status": engine.status(),
            })
        }
        AutomationAction::Stop => {
            engine.stop();
            json!({ "success": true, "message": "Automation stopped successfully" })
        }
        AutomationAction::UpdateSchedules => {
            let schedules = request
                .schedules
                .ok_or_else(|| InvalidRequestError::new("schedules is required"))?;
            engine.update_schedules(schedules)?;
            json!({
                "success": true,
                "message": "Schedules updated successfully",
                "schedules": engine.schedules().list(),
            })
        }
        AutomationAction::ToggleSchedule => {
            let (Some(id), Some(enabled)) = (request.schedule_id, request.enabled) else {
                return Err(InvalidRequestError::new("scheduleId and enabled are required").into());
            };
            let schedule = engine.set_schedule_enabled(&id, enabled)?;
            json!({ "success": true, "schedule": schedule })
        }
        AutomationAction::RunAutomation => {
            let report = engine.run_once().await;
            report_body(report, engine)
        }
        AutomationAction::TriggerSchedule => {
            let id = request
                .schedule_id
                .ok_or_else(|| InvalidRequestError::new("scheduleId is required"))?;
            let item = engine.trigger_one(&id).await?;
            json!({ "success": item.success, "result": item })
        }
        AutomationAction::QuickTest => {
            let item = engine.quick_test().await;
            json!({ "success": item.success, "result": item })
        }
        AutomationAction::GenerateAndSchedule => {
            let config = request
                .config
                .ok_or_else(|| InvalidRequestError::new("config is required"))?;
            let post = engine.generate_and_schedule(config).await?;
            json!({
                "success": true,
                "message": "Content generated and scheduled successfully",
                "post": post,
            })
        }
    };
    Ok(Json(body))
}

fn report_body(report: RunReport, engine: &AutomationEngine) -> Value {
    json!({
        "success": true,
        "message": report.message,
        "results": report.items,
        "succeeded": report.succeeded,
        "failed": report.failed,
        "lastRun": report.last_run,
        "timestamp": engine.now(),
    })
}

async fn cron_automation(State(state): State<ApiState>) -> Json<Value> {
    let report = state.engine.run_once().await;
    Json(report_body(report, &state.engine))
}

async fn cron_execute_scheduled(State(state): State<ApiState>) -> Json<Value> {
    let report = state.engine.execute_queued().await;
    Json(json!({
        "success": true,
        "message": report.message,
        "executedPosts": report.items.len(),
        "results": report.items,
        "timestamp": state.engine.now(),
    }))
}

async fn list_posts(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({ "scheduledPosts": state.engine.queue().list() }))
}

async fn create_post(
    State(state): State<ApiState>,
    payload: Result<Json<NewQueuedPost>, JsonRejection>,
) -> ApiResult {
    let Json(input) = payload.map_err(bad_body)?;
    let post = state.engine.create_post(input)?;
    Ok(Json(json!({ "success": true, "post": post })))
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

async fn delete_post(State(state): State<ApiState>, Query(query): Query<IdQuery>) -> ApiResult {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| InvalidRequestError::new("Post ID is required"))?;
    state.engine.queue().delete(&id)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    id: String,
    status: QueueStatus,
}

async fn update_post(
    State(state): State<ApiState>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = payload.map_err(bad_body)?;
    let post = state
        .engine
        .queue()
        .update_status(&update.id, update.status, state.engine.now())?;
    Ok(Json(json!({ "success": true, "post": post })))
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    platform: Option<String>,
    token: Option<String>,
}

async fn validate_token(
    State(state): State<ApiState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenValidation>, ApiError> {
    let (Some(platform), Some(token)) = (query.platform, query.token) else {
        return Err(InvalidRequestError::new("Platform and token are required").into());
    };
    let platform = Platform::from_str(&platform)
        .map_err(|_| InvalidRequestError::new(format!("Unknown platform '{}'", platform)))?;
    let validation =
        postmill_social::validate_token(platform, &token, state.graph_base_url.as_deref()).await?;
    Ok(Json(validation))
}
