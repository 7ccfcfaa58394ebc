//! API Server for the HomeScape booking backend
//!
//! Serves the REST API on the configured port (5000 by default).

mod auth;
mod config;
mod error;
mod notify;
mod payment;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use homescape_core::store::Database;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::notify::{Mailer, SmtpMailer};
use crate::payment::{PaymentGateway, StripeGateway};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homescape_api=debug,homescape_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_secret() {
        tracing::warn!("ACCESS_TOKEN_SECRET not set, signing tokens with the development secret");
    }

    // A store that cannot be reached still lets the liveness routes answer
    let database = match Database::connect(&config.database_uri).await {
        Ok(database) => {
            tracing::info!(uri = %config.database_uri, "Connected to document store");
            database
        }
        Err(err) => {
            tracing::error!(uri = %config.database_uri, error = %err, "Failed to connect to document store");
            Database::unavailable(err.to_string())
        }
    };

    let mailer: Option<Arc<dyn Mailer>> = match &config.mail {
        Some(mail) => match SmtpMailer::new(mail) {
            Ok(mailer) => {
                tracing::info!(relay = %mail.relay, "Booking notifications enabled");
                Some(Arc::new(mailer))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Invalid mail settings, booking notifications disabled");
                None
            }
        },
        None => {
            tracing::info!("EMAIL/PASS not set, booking notifications disabled");
            None
        }
    };

    let payments: Option<Arc<dyn PaymentGateway>> = match &config.stripe_secret_key {
        Some(key) => Some(Arc::new(StripeGateway::new(key.clone()))),
        None => {
            tracing::info!("STRIPE_SECRET_KEY not set, payment intents disabled");
            None
        }
    };

    let tokens = TokenService::new(&config.token_secret, config.token_ttl);
    tracing::debug!(ttl_hours = tokens.ttl().num_hours(), "Token service ready");
    let app_state = AppState::new(database, tokens, mailer, payments);

    let app = routes::router(app_state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());

    // Bind to 0.0.0.0 for localhost/127.0.0.1 compatibility
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
