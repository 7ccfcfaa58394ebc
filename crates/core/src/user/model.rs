//! Identity record definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;

pub const EMAIL_FIELD: &str = "email";
pub const ROLE_FIELD: &str = "role";

/// Role carried by an identity record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Guest,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Admin => "admin",
        }
    }

    /// Interpret a stored role field. Only the exact string `admin` grants
    /// admin; an absent or unrecognised value is a guest.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("admin") => Self::Admin,
            _ => Self::Guest,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// A stored user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    /// Every other profile field, role included, as supplied by the client
    #[serde(flatten)]
    pub fields: Document,
}

impl UserRecord {
    pub fn role(&self) -> Role {
        Role::from_field(self.fields.get(ROLE_FIELD))
    }
}
