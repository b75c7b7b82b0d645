//! HTTP mapping for the shared error taxonomy.
//!
//! Every failure is terminal for its request: handlers and middleware
//! build an [`AppError`] and return it through [`error_response`], so the
//! status code and error code always agree with the taxonomy. Internal
//! detail stays in the logs; the response body carries only the message
//! the caller is meant to see.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use gestia_shared::AppError;

/// Renders an [`AppError`] as a JSON error response.
pub(crate) fn error_response(error: &AppError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use gestia_shared::AppError;

    use super::error_response;

    #[test]
    fn test_status_follows_the_taxonomy() {
        let response = error_response(&AppError::Validation("fechaInicio is required".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(&AppError::Unauthorized("token expired".into()));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = error_response(&AppError::Internal("anything".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
