//! Listing endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use homescape_core::{
    document::{DeleteResult, Document, InsertOneResult, UpdateResult},
    home::Home,
};
use serde::Deserialize;

use super::{ensure_owner, json_body};
use crate::{
    auth::{require_token, AuthClaims},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub location: Option<String>,
}

async fn search_homes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Home>>, ApiError> {
    let location = query
        .location
        .as_deref()
        .filter(|location| !location.is_empty());
    Ok(Json(state.homes().list(location).await?))
}

async fn list_homes(State(state): State<AppState>) -> Result<Json<Vec<Home>>, ApiError> {
    Ok(Json(state.homes().list(None).await?))
}

async fn list_host_homes(
    State(state): State<AppState>,
    claims: Extension<AuthClaims>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Home>>, ApiError> {
    ensure_owner(&claims, &email)?;
    Ok(Json(state.homes().list_by_host(&email).await?))
}

async fn get_home(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Home>>, ApiError> {
    Ok(Json(state.homes().get(&id).await?))
}

async fn create_home(
    State(state): State<AppState>,
    payload: Result<Json<Home>, JsonRejection>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let home = json_body(payload)?;
    let result = state.homes().create(&home).await?;
    tracing::info!(home_id = %result.inserted_id, host = ?home.host_email(), "Listing created");
    Ok(Json(result))
}

async fn upsert_home(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<UpdateResult>, ApiError> {
    let fields = json_body(payload)?;
    Ok(Json(state.homes().upsert(&id, fields).await?))
}

async fn delete_home(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.homes().delete(&id).await?;
    tracing::info!(home_id = %id, deleted = result.deleted_count, "Listing deleted");
    Ok(Json(result))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let token = middleware::from_fn_with_state(state.clone(), require_token);

    Router::new()
        .route("/search-homes", get(search_homes))
        .route(
            "/homes",
            get(list_homes).merge(post(create_home).route_layer(token.clone())),
        )
        .route(
            "/homes/{email}",
            get(list_host_homes).route_layer(token.clone()),
        )
        .route(
            "/home/{id}",
            get(get_home).merge(
                put(upsert_home)
                    .delete(delete_home)
                    .route_layer(token),
            ),
        )
}
