//! Unified error handling with Sentry integration.
//!
//! Every callable returns `Result<T, AppError>`. Each variant is one error
//! category of the callable protocol; [`AppError::into_response`] renders it
//! as
//!
//! ```json
//! { "error": { "status": "INVALID_ARGUMENT", "message": "storeId is required" } }
//! ```
//!
//! with the matching HTTP status. Storage and internal failures are captured
//! to Sentry and reported to the client with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kirana_core::MoneyError;
use serde_json::json;
use thiserror::Error;

use crate::orders::ValidationError;
use crate::store::StoreError;

/// Application-level error type for the callable functions.
#[derive(Debug, Error)]
pub enum AppError {
    /// No caller identity on the request.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The request payload failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream data is missing something this call relies on.
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// The caller may not access the resource.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A backend call did not finish within the configured timeout.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(StoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Callable protocol status name.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::FailedPrecondition(_) => "FAILED_PRECONDITION",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
            Self::Storage(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP status code for this category.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Internal(_) => "Internal error".to_string(),
            Self::Unauthenticated(msg)
            | Self::InvalidArgument(msg)
            | Self::NotFound(msg)
            | Self::FailedPrecondition(msg)
            | Self::PermissionDenied(msg)
            | Self::DeadlineExceeded(msg) => msg.clone(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::Unauthenticated => Self::Unauthenticated(message),
            _ => Self::InvalidArgument(message),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPath(msg) => Self::InvalidArgument(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::info!(status = self.status(), error = %self, "Request rejected");
        }

        let body = json!({
            "error": {
                "status": self.status(),
                "message": self.client_message(),
            }
        });

        (self.http_status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(account_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("store S9".to_string());
        assert_eq!(err.to_string(), "Not found: store S9");

        let err = AppError::InvalidArgument("storeId is required".to_string());
        assert_eq!(err.to_string(), "Invalid argument: storeId is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Unauthenticated("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::InvalidArgument("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::FailedPrecondition("test".to_string())),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            get_status(AppError::PermissionDenied("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::DeadlineExceeded("test".to_string())),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_map_to_categories() {
        assert_eq!(
            AppError::from(ValidationError::Unauthenticated).status(),
            "UNAUTHENTICATED"
        );
        assert_eq!(
            AppError::from(ValidationError::MissingStoreId).status(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            AppError::from(ValidationError::InvalidQuantity { index: 0 }).status(),
            "INVALID_ARGUMENT"
        );
    }

    #[test]
    fn test_storage_detail_is_hidden_from_client() {
        let err = AppError::from(StoreError::Unavailable("disk on fire".to_string()));
        assert_eq!(err.status(), "INTERNAL");
        assert_eq!(err.client_message(), "Internal error");
    }

    #[test]
    fn test_invalid_path_is_caller_error() {
        let err = AppError::from(StoreError::InvalidPath("a/b".to_string()));
        assert_eq!(err.status(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_error_body_envelope() {
        let response = AppError::NotFound("store S9 does not exist".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["status"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "store S9 does not exist");
    }
}
