/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `ApiResult<T>`; every shared-crate error converts into
/// [`ApiError`] with `?`.
///
/// # Status mapping
///
/// | Error | Status |
/// |---|---|
/// | `BadRequest`, `Validation`, `Conflict` | 400 |
/// | `Unauthorized` | 401 |
/// | `Forbidden` | 403 |
/// | `NotFound` | 404 |
/// | `Internal` | 500 (details logged, generic message returned) |
///
/// # Example
///
/// ```no_run
/// use teamboard_api::error::ApiResult;
/// use teamboard_api::response::{self, Reply};
///
/// async fn handler() -> ApiResult<Reply<()>> {
///     Ok(response::done("Nothing to do"))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use teamboard_shared::auth::middleware::AuthError;
use teamboard_shared::pagination::PaginationError;
use teamboard_shared::services::{FieldError, ServiceError};
use tracing::error;

use crate::response::Envelope;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body, query or path (400)
    #[error("{0}")]
    BadRequest(String),

    /// Per-field validation failures (400)
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Uniqueness violation, e.g. duplicate email (400)
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid identity (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Role denial (403)
    #[error("{0}")]
    Forbidden(String),

    /// Missing target or governing project (404)
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => Envelope::failure("Validation failed", Some(errors)),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                error!(error = %msg, "Internal error");
                Envelope::failure("Internal server error", None)
            }
            other => Envelope::failure(other.to_string(), None),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::NotFound(resource) => ApiError::NotFound(format!("{resource} not found")),
            e @ ServiceError::Forbidden => ApiError::Forbidden(e.to_string()),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            e @ (ServiceError::Store(_) | ServiceError::Password(_) | ServiceError::Jwt(_)) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::Validation(vec![FieldError::new(err.field(), err.to_string())])
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejection is an [`ApiError`] envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejection is an [`ApiError`] envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path` extractor whose rejection is an [`ApiError`] envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use teamboard_shared::auth::authorization::Resource;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_conversion() {
        let err = ApiError::from(ServiceError::NotFound(Resource::Task));
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Task not found"));

        let err = ApiError::from(ServiceError::Forbidden);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = ApiError::from(PaginationError::InvalidLimit);
        assert!(matches!(err, ApiError::Validation(ref e) if e[0].field == "limit"));
    }

    #[tokio::test]
    async fn test_validation_response_body() {
        let response = ApiError::Validation(vec![FieldError::new("title", "Title is required")])
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["message"], "Title is required");
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let response = ApiError::Internal("connection refused on 10.0.0.3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
    }
}
