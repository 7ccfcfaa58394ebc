//! Application state

use std::sync::Arc;

use homescape_core::{booking::BookingStore, home::HomeStore, store::Database, user::UserStore};

use crate::{auth::TokenService, notify::Mailer, payment::PaymentGateway};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    database: Database,
    users: UserStore,
    homes: HomeStore,
    bookings: BookingStore,
    tokens: TokenService,
    mailer: Option<Arc<dyn Mailer>>,
    payments: Option<Arc<dyn PaymentGateway>>,
}

impl AppState {
    /// Create a new AppState over an opened database.
    ///
    /// Without a mailer booking notifications are skipped; without a payment
    /// gateway payment-intent creation answers 503.
    pub fn new(
        database: Database,
        tokens: TokenService,
        mailer: Option<Arc<dyn Mailer>>,
        payments: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: UserStore::new(database.users()),
                homes: HomeStore::new(database.homes()),
                bookings: BookingStore::new(database.bookings()),
                database,
                tokens,
                mailer,
                payments,
            }),
        }
    }

    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    pub fn homes(&self) -> &HomeStore {
        &self.inner.homes
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.inner.bookings
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn mailer(&self) -> Option<Arc<dyn Mailer>> {
        self.inner.mailer.clone()
    }

    pub fn payments(&self) -> Option<Arc<dyn PaymentGateway>> {
        self.inner.payments.clone()
    }
}
