//! Listing record definitions

use serde::{Deserialize, Serialize};

use crate::document::Document;

pub const LOCATION_FIELD: &str = "location";
pub const HOST_EMAIL_PATH: &str = "host.email";

/// Host section of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: Document,
}

/// A property listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Home {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub fields: Document,
}

impl Home {
    pub fn host_email(&self) -> Option<&str> {
        self.host.as_ref().and_then(|host| host.email.as_deref())
    }
}
