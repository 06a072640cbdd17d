//! Access token validation helper.

use crate::config::GRAPH_API_BASE;
use derive_getters::Getters;
use postmill_core::Platform;
use postmill_error::{HttpError, InvalidRequestError, PostmillResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// Result of validating an access token.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    valid: bool,
    platform: Platform,
    user_id: Option<String>,
    user_name: Option<String>,
    error: Option<String>,
}

impl TokenValidation {
    fn from_me_response(platform: Platform, ok: bool, body: &Value) -> Self {
        let id = body.get("id").and_then(Value::as_str);
        match (ok, id) {
            (true, Some(id)) => Self {
                valid: true,
                platform,
                user_id: Some(id.to_string()),
                user_name: Some(
                    body.get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown")
                        .to_string(),
                ),
                error: None,
            },
            _ => Self {
                valid: false,
                platform,
                user_id: None,
                user_name: None,
                error: Some(
                    body.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(Value::as_str)
                        .unwrap_or("Token validation failed")
                        .to_string(),
                ),
            },
        }
    }
}

/// Validate a Graph API token against `/me`.
///
/// `base_url` defaults to the public Graph API.
///
/// # Errors
///
/// Returns [`InvalidRequestError`] for platforms without token validation
/// and [`HttpError`] on transport failure.
#[instrument(skip(token))]
pub async fn validate_token(
    platform: Platform,
    token: &str,
    base_url: Option<&str>,
) -> PostmillResult<TokenValidation> {
    if token.trim().is_empty() {
        return Err(InvalidRequestError::new("Platform and token are required").into());
    }
    if !matches!(platform, Platform::Facebook | Platform::Instagram) {
        return Err(InvalidRequestError::new(format!(
            "Token validation is not supported for {}",
            platform
        ))
        .into());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| HttpError::new(e.to_string()))?;
    let response = client
        .get(format!("{}/me", base_url.unwrap_or(GRAPH_API_BASE)))
        .query(&[("access_token", token)])
        .send()
        .await
        .map_err(|e| HttpError::new(e.to_string()))?;

    let ok = response.status().is_success();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    Ok(TokenValidation::from_me_response(platform, ok, &body))
}
