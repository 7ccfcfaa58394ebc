//! Listing store

use std::sync::Arc;

use super::model::{Home, HOST_EMAIL_PATH, LOCATION_FIELD};
use crate::document::{
    expand, from_document, from_documents, to_document, DeleteResult, Document, Filter,
    InsertOneResult, UpdateResult,
};
use crate::store::{Collection, HOMES};
use crate::{Error, Result};

#[derive(Clone)]
pub struct HomeStore {
    collection: Arc<dyn Collection>,
}

impl HomeStore {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    /// All listings, or only those at `location`
    pub async fn list(&self, location: Option<&str>) -> Result<Vec<Home>> {
        let filter = match location {
            Some(location) => Filter::eq(LOCATION_FIELD, location),
            None => Filter::all(),
        };
        self.find(&filter).await
    }

    /// Listings whose `host.email` equals `email`
    pub async fn list_by_host(&self, email: &str) -> Result<Vec<Home>> {
        self.find(&Filter::eq(HOST_EMAIL_PATH, email)).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Home>> {
        self.collection
            .find_one(&Filter::by_id(id))
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn create(&self, home: &Home) -> Result<InsertOneResult> {
        self.collection.insert_one(to_document(home)?).await
    }

    /// Set the supplied listing fields on `id`, creating it if absent.
    ///
    /// Fields are written as given, explicit nulls included. The update must
    /// still read back as a listing: `location` stays a string and `host` an
    /// object.
    pub async fn upsert(&self, id: &str, fields: Document) -> Result<UpdateResult> {
        from_document::<Home>(expand(&fields)?)
            .map_err(|err| Error::InvalidInput(format!("Invalid listing fields: {}", err)))?;
        self.collection
            .update_one(&Filter::by_id(id), fields, true)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteResult> {
        self.collection.delete_one(&Filter::by_id(id)).await
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Home>> {
        Ok(from_documents(HOMES, self.collection.find(filter).await?))
    }
}
