//! Response envelope and error-to-status mapping.
//!
//! Every success payload is wrapped as `{"message": ..., "data": ...}` and
//! every error as `{"message": ...}`, the format the web client consumes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hms_core::HmsError;
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Error envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Wrapper turning an [`HmsError`] into an HTTP response.
///
/// Conflicts and authorization failures map to 400, not 409/403. Callers
/// depend on that mapping, so it is preserved rather than corrected.
#[derive(Debug)]
pub struct ApiError(pub HmsError);

impl From<HmsError> for ApiError {
    fn from(err: HmsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            HmsError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            HmsError::Validation(message)
            | HmsError::Conflict(message)
            | HmsError::Forbidden(message) => (StatusCode::BAD_REQUEST, message),
            HmsError::Unauthenticated(message) => (StatusCode::UNAUTHORIZED, message),
            HmsError::Internal(message) => {
                tracing::error!("request failed: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: HmsError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn statuses_match_the_preserved_taxonomy() {
        assert_eq!(
            status_of(HmsError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(HmsError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(HmsError::Conflict("x".into())),
            StatusCode::BAD_REQUEST,
            "conflicts surface as 400, not 409"
        );
        assert_eq!(
            status_of(HmsError::Forbidden("x".into())),
            StatusCode::BAD_REQUEST,
            "authorization failures surface as 400, not 403"
        );
        assert_eq!(
            status_of(HmsError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(HmsError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
