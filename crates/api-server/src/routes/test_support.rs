//! Shared fixtures for router and guard tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use homescape_core::store::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    auth::TokenService,
    notify::{MailError, Mailer, OutgoingEmail},
    payment::{PaymentError, PaymentGateway, PaymentIntent},
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET, chrono::Duration::hours(5))
}

/// In-memory store, no mailer, no payment provider
pub fn build_state() -> AppState {
    state_with_database(Database::in_memory())
}

pub fn state_with_database(database: Database) -> AppState {
    AppState::new(database, test_tokens(), None, None)
}

pub fn state_with_collaborators(
    mailer: Option<Arc<dyn Mailer>>,
    payments: Option<Arc<dyn PaymentGateway>>,
) -> AppState {
    AppState::new(Database::in_memory(), test_tokens(), mailer, payments)
}

pub fn token_for(state: &AppState, email: &str) -> String {
    state
        .tokens()
        .issue(json!({ "email": email }).as_object().cloned().unwrap())
        .unwrap()
}

/// Drive one request through `app`. Non-JSON bodies come back as a string.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// Records every message handed to it, optionally failing each send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            let address = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(address));
        }
        Ok(())
    }
}

/// Payment provider that hands back a fixed secret and remembers amounts
#[derive(Default)]
pub struct FakeGateway {
    requests: Mutex<Vec<(i64, String)>>,
}

impl FakeGateway {
    pub fn requests(&self) -> Vec<(i64, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        self.requests
            .lock()
            .unwrap()
            .push((amount, currency.to_string()));
        Ok(PaymentIntent {
            id: format!("pi_{}", amount),
            client_secret: format!("pi_{}_secret", amount),
        })
    }
}
