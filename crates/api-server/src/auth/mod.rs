//! Token issuance and request guards.

mod guard;
mod jwt;

use thiserror::Error;

pub use guard::{require_admin, require_token};
pub use jwt::{AuthClaims, TokenService};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized access")]
    Unauthenticated,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token expired")]
    Expired,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}
