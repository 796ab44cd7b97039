//! Error responses.
//!
//! # Responsibilities
//! - Render the JSON error body used for every response the service itself
//!   produces (unmatched routes, handler panics)
//! - Log runtime failures; the process keeps serving
//!
//! Body shape: `{"timestamp": "...", "status": 404, "error": "Not Found", "path": "/x"}`.

use std::any::Any;

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::FailureKind;

/// JSON body of error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, path: Option<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
            path,
        }
    }
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, path: Option<String>) -> Response {
    (status, Json(ErrorBody::new(status, path))).into_response()
}

/// Fallback for requests no registered route matches.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    error_response(StatusCode::NOT_FOUND, Some(uri.path().to_string()))
}

/// Turn a handler panic into a `500`.
///
/// The panic stays confined to the request that raised it.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(kind = %FailureKind::Runtime, panic = %detail, "Request handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_reports_path() {
        let response = not_found("/missing?x=1".parse().unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/missing");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn panic_payloads_become_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body.get("path").is_none());

        let response = panic_response(Box::new(String::from("owned boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
