//! Identity store
//!
//! Every write is an upsert keyed by email: supplied fields overwrite,
//! unsupplied fields survive.

use std::sync::Arc;

use serde_json::Value;

use super::model::{Role, UserRecord, EMAIL_FIELD};
use crate::document::{from_document, from_documents, Document, Filter, UpdateResult};
use crate::store::{Collection, USERS};
use crate::{Error, Result};

#[derive(Clone)]
pub struct UserStore {
    collection: Arc<dyn Collection>,
}

impl UserStore {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    /// Create or overwrite the profile stored under `email`.
    ///
    /// The key email wins over any `email` field in the payload so there is
    /// never more than one record per email.
    pub async fn upsert(&self, email: &str, mut fields: Document) -> Result<UpdateResult> {
        let email = validate_email(email)?;
        fields.insert(EMAIL_FIELD.to_string(), Value::String(email.to_string()));
        self.collection
            .update_one(&Filter::eq(EMAIL_FIELD, email), fields, true)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.collection
            .find_one(&Filter::eq(EMAIL_FIELD, email))
            .await?
            .map(from_document)
            .transpose()
    }

    /// Every stored profile. Records that no longer read as a profile are
    /// logged and left out.
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        Ok(from_documents(USERS, self.collection.find(&Filter::all()).await?))
    }

    /// Role of the stored identity, `None` when there is no such record
    pub async fn role_of(&self, email: &str) -> Result<Option<Role>> {
        Ok(self.find_by_email(email).await?.map(|user| user.role()))
    }
}

fn validate_email(email: &str) -> Result<&str> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email cannot be empty".to_string()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::FileCollection;

    fn fields(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn create_test_store() -> UserStore {
        UserStore::new(Arc::new(FileCollection::in_memory("users")))
    }

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() {
        let store = create_test_store();

        let created = store
            .upsert("alice@x.com", fields(json!({ "name": "Alice", "city": "Dhaka" })))
            .await
            .unwrap();
        assert_eq!(created.upserted_count, 1);

        let updated = store
            .upsert("alice@x.com", fields(json!({ "name": "Alice B" })))
            .await
            .unwrap();
        assert_eq!(updated.matched_count, 1);
        assert_eq!(updated.modified_count, 1);

        let user = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(user.fields["name"], "Alice B");
        // Unsupplied fields survive
        assert_eq!(user.fields["city"], "Dhaka");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_email() {
        let store = create_test_store();
        let profile = fields(json!({ "email": "alice@x.com", "name": "Alice" }));

        store.upsert("alice@x.com", profile.clone()).await.unwrap();
        let second = store.upsert("alice@x.com", profile).await.unwrap();
        assert_eq!(second.modified_count, 0);

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "alice@x.com");
        assert_eq!(users[0].fields["name"], "Alice");
    }

    #[tokio::test]
    async fn test_key_email_wins_over_payload() {
        let store = create_test_store();

        store
            .upsert("alice@x.com", fields(json!({ "email": "mallory@x.com" })))
            .await
            .unwrap();

        assert!(store.find_by_email("mallory@x.com").await.unwrap().is_none());
        assert!(store.find_by_email("alice@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_role_of() {
        let store = create_test_store();
        store
            .upsert("admin@x.com", fields(json!({ "role": "admin" })))
            .await
            .unwrap();
        store
            .upsert("guest@x.com", fields(json!({ "name": "G" })))
            .await
            .unwrap();

        assert_eq!(store.role_of("admin@x.com").await.unwrap(), Some(Role::Admin));
        assert_eq!(store.role_of("guest@x.com").await.unwrap(), Some(Role::Guest));
        assert_eq!(store.role_of("nobody@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let store = create_test_store();
        let result = store.upsert("  ", Document::new()).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_upsert_cannot_nest_under_email() {
        let store = create_test_store();
        store.upsert("a@x.com", Document::new()).await.unwrap();

        let result = store
            .upsert("a@x.com", fields(json!({ "email.x": 1 })))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@x.com");
    }
}
