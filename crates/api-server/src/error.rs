//! Mapping of every failure to an HTTP status and a short message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{auth::AuthError, payment::PaymentError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] homescape_core::Error),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        use homescape_core::Error as StoreError;

        match self {
            Self::Auth(AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "unauthorized access".to_string())
            }
            Self::Auth(AuthError::Invalid(_) | AuthError::Expired | AuthError::Forbidden(_)) => {
                (StatusCode::FORBIDDEN, "Forbidden access".to_string())
            }
            Self::Auth(AuthError::Signing(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to issue token".to_string(),
            ),
            Self::Store(StoreError::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Store unavailable".to_string(),
            ),
            Self::Store(StoreError::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Store(StoreError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store error".to_string(),
            ),
            Self::Payment(PaymentError::NotConfigured) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Payment provider not configured".to_string(),
            ),
            Self::Payment(PaymentError::InvalidAmount(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Payment(_) => (
                StatusCode::BAD_GATEWAY,
                "Payment provider error".to_string(),
            ),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn auth_errors_split_between_401_and_403() {
        assert_eq!(status(AuthError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::Expired), StatusCode::FORBIDDEN);
        assert_eq!(
            status(AuthError::Invalid("bad signature".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(AuthError::Forbidden("not admin".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn store_errors_are_server_side() {
        assert_eq!(
            status(homescape_core::Error::Unavailable("down".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(homescape_core::Error::Io(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(homescape_core::Error::InvalidInput("empty".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn payment_errors() {
        assert_eq!(status(PaymentError::NotConfigured), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(PaymentError::Provider("declined".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }
}
