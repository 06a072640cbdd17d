//! Graph API error classification shared by Facebook and Instagram.

use postmill_error::{PublishError, PublishErrorKind};
use reqwest::StatusCode;
use serde_json::Value;

const CODE_PERMISSION: i64 = 200;
const CODE_TOKEN: i64 = 190;

/// Classify a failed Graph API response.
///
/// Error code 200 or a message naming the page scopes means the token lacks
/// permissions; code 190 or an access-token/session message means it expired.
pub(crate) fn classify_error(status: StatusCode, body: &Value) -> PublishError {
    let error = body.get("error");
    let code = error.and_then(|e| e.get("code")).and_then(Value::as_i64);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Graph API error: {}", status));

    let kind = if code == Some(CODE_PERMISSION)
        || message.contains("pages_read_engagement")
        || message.contains("pages_manage_posts")
    {
        PublishErrorKind::Permission(format!(
            "Access token lacks required permissions (pages_read_engagement, pages_manage_posts): {}",
            message
        ))
    } else if code == Some(CODE_TOKEN)
        || message.contains("access token")
        || message.contains("Session has expired")
    {
        PublishErrorKind::TokenExpired(format!("Access token has expired: {}", message))
    } else {
        PublishErrorKind::Failed(message)
    };
    PublishError::new(kind)
}

/// Post id from a Graph API success body.
pub(crate) fn post_id(body: &Value) -> Option<String> {
    ["post_id", "id"]
        .into_iter()
        .find_map(|key| body.get(key))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_200_is_permission() {
        let body = json!({"error": {"code": 200, "message": "Permissions error"}});
        let err = classify_error(StatusCode::FORBIDDEN, &body);
        assert_eq!(err.category(), "permission");
    }

    #[test]
    fn test_scope_message_is_permission() {
        let body = json!({"error": {"code": 10, "message": "requires pages_manage_posts"}});
        let err = classify_error(StatusCode::BAD_REQUEST, &body);
        assert_eq!(err.category(), "permission");
    }

    #[test]
    fn test_expired_token() {
        let body = json!({"error": {"code": 190, "message": "Error validating"}});
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, &body).category(),
            "token_expired"
        );

        let body = json!({"error": {"message": "Session has expired on Tuesday"}});
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, &body).category(),
            "token_expired"
        );
    }

    #[test]
    fn test_other_errors_are_generic() {
        let body = json!({"error": {"code": 1, "message": "Unknown error"}});
        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert_eq!(err.kind, PublishErrorKind::Failed("Unknown error".to_string()));

        let err = classify_error(StatusCode::BAD_GATEWAY, &json!({}));
        assert_eq!(err.category(), "publish");
    }

    #[test]
    fn test_post_id_prefers_post_id() {
        assert_eq!(
            post_id(&json!({"id": "photo_1", "post_id": "page_1_post"})),
            Some("page_1_post".to_string())
        );
        assert_eq!(post_id(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(post_id(&json!({})), None);
    }
}
