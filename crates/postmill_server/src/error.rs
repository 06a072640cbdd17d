//! HTTP rendering of workspace errors.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use postmill_error::{InvalidRequestError, PostmillError, PostmillErrorKind, PublishErrorKind};
use serde_json::json;
use tracing::error;

/// Error returned from API handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(PostmillError);

impl ApiError {
    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            PostmillErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            PostmillErrorKind::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PostmillErrorKind::Publish(e) => match e.kind {
                PublishErrorKind::Permission(_) => StatusCode::FORBIDDEN,
                PublishErrorKind::TokenExpired(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The wrapped error.
    pub fn inner(&self) -> &PostmillError {
        &self.0
    }
}

impl<E> From<E> for ApiError
where
    E: Into<PostmillError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}

/// Map a body that failed to deserialize to a 400.
pub(crate) fn bad_body(rejection: JsonRejection) -> ApiError {
    InvalidRequestError::new(rejection.body_text()).into()
}
