//! Booking endpoints
//!
//! Creating a booking also queues a confirmation email to the guest. The
//! email goes out on its own task and cannot fail the booking.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    middleware,
    routing::{delete, get},
    Json, Router,
};
use homescape_core::{
    booking::Booking,
    document::{DeleteResult, InsertOneResult},
};
use serde::Deserialize;

use super::json_body;
use crate::{
    auth::require_token,
    error::ApiError,
    notify::{self, OutgoingEmail},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    #[serde(default)]
    pub email: Option<String>,
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let email = query.email.as_deref().filter(|email| !email.is_empty());
    Ok(Json(state.bookings().list(email).await?))
}

async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<Booking>, JsonRejection>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let booking = json_body(payload)?;
    let result = state.bookings().create(&booking).await?;
    tracing::info!(booking_id = %result.inserted_id, "Booking created");

    match (state.mailer(), booking.guest_email.as_deref()) {
        (Some(mailer), Some(guest)) => {
            let email = OutgoingEmail::booking_confirmation(
                guest,
                &result.inserted_id,
                booking.transaction_id.as_deref(),
            );
            notify::dispatch(mailer, email);
        }
        (None, _) => {
            tracing::debug!(booking_id = %result.inserted_id, "No mailer configured, skipping confirmation")
        }
        (_, None) => {
            tracing::debug!(booking_id = %result.inserted_id, "Booking has no guest email, skipping confirmation")
        }
    }

    Ok(Json(result))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.bookings().delete(&id).await?))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let token = middleware::from_fn_with_state(state.clone(), require_token);

    Router::new()
        .route(
            "/bookings",
            get(list_bookings)
                .post(create_booking)
                .route_layer(token.clone()),
        )
        .route(
            "/bookings/{id}",
            delete(delete_booking).route_layer(token),
        )
}
