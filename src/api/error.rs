//! Error types and conversions for the public API layer.
//!
//! Maps service errors onto HTTP responses with a consistent JSON body of
//! shape `{ "error": <message>, "code": <code>, "request_id": <id> }`.

use crate::models::OrderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// API error carrying everything needed to render the response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    request_id: String,
}

impl ApiError {
    /// Translate a service error, attaching the request's correlation id.
    ///
    /// Internal failures keep their details in the log and send a generic
    /// message to the client.
    pub fn from_order(err: OrderError, request_id: String) -> Self {
        let (status, code, message) = match &err {
            OrderError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            OrderError::InvalidPrice(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_PRICE", msg.clone())
            }
            OrderError::NotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            OrderError::DuplicateEntry => {
                (StatusCode::CONFLICT, "DUPLICATE_ENTRY", err.to_string())
            }
            OrderError::Unsupported(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED", msg.clone())
            }
            OrderError::Storage(_) | OrderError::Cache(_) => {
                error!(request_id = %request_id, "internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "an internal error happened while processing your request".to_string(),
                )
            }
        };

        Self {
            status,
            code,
            message,
            request_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message,
            "code": self.code,
            "request_id": self.request_id,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: OrderError) -> StatusCode {
        ApiError::from_order(err, "req-1".into()).status
    }

    #[test]
    fn test_error_kinds_map_to_status_codes() {
        assert_eq!(
            status_of(OrderError::InvalidArgument("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(OrderError::InvalidPrice("crossed".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(OrderError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(OrderError::DuplicateEntry), StatusCode::CONFLICT);
        assert_eq!(
            status_of(OrderError::Unsupported("history".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(OrderError::Storage(crate::store::StoreError::Timeout)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api_err = ApiError::from_order(
            OrderError::Storage(crate::store::StoreError::Timeout),
            "req-2".into(),
        );
        assert!(!api_err.message.contains("deadline"));
    }
}
