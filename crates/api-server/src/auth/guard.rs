//! Request guards, applied per route with `middleware::from_fn_with_state`.
//!
//! `require_token` proves who the caller is. `require_admin` runs inside it and
//! checks the stored role. Resource ownership is left to the handlers.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use homescape_core::user::Role;

use super::{AuthClaims, AuthError};
use crate::{error::ApiError, state::AppState};

pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?;
    let token = bearer_token(header)
        .ok_or_else(|| AuthError::Forbidden("malformed authorization header".to_string()))?;

    let claims = state
        .tokens()
        .verify(token)
        .map_err(|err| AuthError::Forbidden(err.to_string()))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let email = request
        .extensions()
        .get::<AuthClaims>()
        .ok_or_else(|| AuthError::Forbidden("no verified token".to_string()))?
        .email()
        .ok_or_else(|| AuthError::Forbidden("token carries no email".to_string()))?
        .to_string();

    let role = state.users().role_of(&email).await?;
    if !role.is_some_and(Role::is_admin) {
        return Err(AuthError::Forbidden(format!("{} is not an admin", email)).into());
    }

    Ok(next.run(request).await)
}

fn bearer_token(value: &HeaderValue) -> Option<&str> {
    let (scheme, token) = value.to_str().ok()?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
    use serde_json::json;

    use super::*;
    use crate::routes::test_support::{build_state, send, token_for};

    async fn whoami(Extension(claims): Extension<AuthClaims>) -> String {
        claims.email().unwrap_or_default().to_string()
    }

    fn guarded_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/me",
                get(whoami).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_token,
                )),
            )
            .route(
                "/admin",
                get(whoami)
                    .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
                    .route_layer(middleware::from_fn_with_state(state.clone(), require_token)),
            )
            .with_state(state)
    }

    #[test]
    fn bearer_token_parsing() {
        let parse =
            |raw: &'static str| bearer_token(&HeaderValue::from_static(raw)).map(str::to_string);

        assert_eq!(parse("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(parse("bearer   abc ").as_deref(), Some("abc"));
        assert_eq!(parse("Basic abc"), None);
        assert_eq!(parse("Bearer"), None);
        assert_eq!(parse("Bearer  "), None);
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let app = guarded_app(build_state());

        let (status, body) = send(&app, "GET", "/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "unauthorized access");
    }

    #[tokio::test]
    async fn bad_tokens_are_forbidden() {
        let state = build_state();
        let app = guarded_app(state.clone());

        let (status, _) = send(&app, "GET", "/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let expired = state
            .tokens()
            .issue_with_ttl(
                json!({ "email": "a@x.com" }).as_object().cloned().unwrap(),
                chrono::Duration::hours(-1),
            )
            .unwrap();
        let (status, body) = send(&app, "GET", "/me", Some(&expired), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Forbidden access");
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_claims() {
        let state = build_state();
        let app = guarded_app(state.clone());
        let token = token_for(&state, "alice@x.com");

        let (status, body) = send(&app, "GET", "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("alice@x.com"));
    }

    #[tokio::test]
    async fn admin_guard_checks_stored_role() {
        let state = build_state();
        let app = guarded_app(state.clone());

        state
            .users()
            .upsert(
                "root@x.com",
                json!({ "role": "admin" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        state
            .users()
            .upsert(
                "guest@x.com",
                json!({ "role": "guest" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        // Token passes, role does not
        let guest = token_for(&state, "guest@x.com");
        let (status, _) = send(&app, "GET", "/admin", Some(&guest), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // No stored identity at all
        let stranger = token_for(&state, "stranger@x.com");
        let (status, _) = send(&app, "GET", "/admin", Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token_for(&state, "root@x.com");
        let (status, body) = send(&app, "GET", "/admin", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("root@x.com"));

        // Admin guard never runs without a token
        let (status, _) = send(&app, "GET", "/admin", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_role_claim_does_not_grant_admin() {
        let state = build_state();
        let app = guarded_app(state.clone());

        let forged = state
            .tokens()
            .issue(
                json!({ "email": "guest@x.com", "role": "admin" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .unwrap();
        let (status, _) = send(&app, "GET", "/admin", Some(&forged), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
