//! Payment-intent endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::{
    auth::require_token,
    error::ApiError,
    payment::{amount_in_cents, PaymentError},
    state::AppState,
};

const CURRENCY: &str = "usd";

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<PaymentIntentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let request = json_body(payload)?;
    let price = request
        .price
        .ok_or_else(|| ApiError::Validation("price is required".to_string()))?;
    let amount = amount_in_cents(price)?;

    let gateway = state.payments().ok_or(PaymentError::NotConfigured)?;
    let intent = gateway.create_intent(amount, CURRENCY).await?;
    tracing::debug!(intent_id = %intent.id, amount, "Payment intent issued to client");

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let token = middleware::from_fn_with_state(state.clone(), require_token);

    Router::new().route(
        "/create-payment-intent",
        post(create_payment_intent).route_layer(token),
    )
}
