//! Booking store
//!
//! Bookings are created and deleted, never updated in place.

use std::sync::Arc;

use super::model::{Booking, GUEST_EMAIL_FIELD};
use crate::document::{from_documents, to_document, DeleteResult, Filter, InsertOneResult};
use crate::store::{Collection, BOOKINGS};
use crate::Result;

#[derive(Clone)]
pub struct BookingStore {
    collection: Arc<dyn Collection>,
}

impl BookingStore {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    /// All bookings, or only those made by `guest_email`
    pub async fn list(&self, guest_email: Option<&str>) -> Result<Vec<Booking>> {
        let filter = match guest_email {
            Some(email) => Filter::eq(GUEST_EMAIL_FIELD, email),
            None => Filter::all(),
        };
        Ok(from_documents(BOOKINGS, self.collection.find(&filter).await?))
    }

    pub async fn create(&self, booking: &Booking) -> Result<InsertOneResult> {
        self.collection.insert_one(to_document(booking)?).await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteResult> {
        self.collection.delete_one(&Filter::by_id(id)).await
    }
}
