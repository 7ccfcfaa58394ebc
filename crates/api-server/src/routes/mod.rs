//! Route handlers
//!
//! Each router attaches the guards its routes need: `require_token` alone for
//! owner routes, `require_token` wrapping `require_admin` for privileged ones.

pub mod bookings;
pub mod health;
pub mod homes;
pub mod payments;
pub mod users;

#[cfg(test)]
pub mod test_support;

use axum::{extract::rejection::JsonRejection, Extension, Json, Router};

use crate::{
    auth::{AuthClaims, AuthError},
    error::ApiError,
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(users::router(&state))
        .merge(payments::router(&state))
        .merge(bookings::router(&state))
        .merge(homes::router(&state))
        .with_state(state)
}

/// Unwrap a JSON body, turning extractor rejections into the common error shape
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Caller must be the owner of the resource keyed by `email`
pub(crate) fn ensure_owner(claims: &Extension<AuthClaims>, email: &str) -> Result<(), ApiError> {
    if claims.email() == Some(email) {
        return Ok(());
    }
    Err(AuthError::Forbidden(format!(
        "{} does not own {}",
        claims.email().unwrap_or("<no email>"),
        email
    ))
    .into())
}
