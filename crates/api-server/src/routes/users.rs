//! Identity endpoints
//!
//! `PUT /user/{email}` is the sign-in point: it upserts the profile and hands
//! back a fresh token. Reads are guarded.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use homescape_core::{
    document::{Document, UpdateResult},
    user::{UserRecord, EMAIL_FIELD, ROLE_FIELD},
};
use serde::Serialize;
use serde_json::Value;

use super::{ensure_owner, json_body};
use crate::{
    auth::{require_admin, require_token, AuthClaims},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UpsertUserResponse {
    pub result: UpdateResult,
    pub token: String,
}

async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<UpsertUserResponse>, ApiError> {
    let fields = json_body(payload)?;
    let result = state.users().upsert(&email, fields.clone()).await?;

    let mut claims = fields;
    claims.insert(EMAIL_FIELD.to_string(), Value::String(email.clone()));
    if let Some(record) = state.users().find_by_email(&email).await? {
        claims.insert(
            ROLE_FIELD.to_string(),
            Value::String(record.role().as_str().to_string()),
        );
    }
    let token = state.tokens().issue(claims)?;

    tracing::info!(email = %email, upserted = result.upserted_id.is_some(), "Identity upserted");
    Ok(Json(UpsertUserResponse { result, token }))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    Ok(Json(state.users().list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    claims: Extension<AuthClaims>,
    Path(email): Path<String>,
) -> Result<Json<Option<UserRecord>>, ApiError> {
    ensure_owner(&claims, &email)?;
    Ok(Json(state.users().find_by_email(&email).await?))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let token = middleware::from_fn_with_state(state.clone(), require_token);
    let admin = middleware::from_fn_with_state(state.clone(), require_admin);

    Router::new()
        .route(
            "/users",
            get(list_users).route_layer(admin).route_layer(token.clone()),
        )
        .route(
            "/user/{email}",
            get(get_user).route_layer(token).put(upsert_user),
        )
}
