//! Booking record definitions

use serde::{Deserialize, Serialize};

use crate::document::Document;

pub const GUEST_EMAIL_FIELD: &str = "guestEmail";

/// A reservation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Dates, listing reference, price and anything else the client sent
    #[serde(flatten)]
    pub fields: Document,
}
