//! Collection trait
//!
//! Defines the interface every document backend offers to the typed stores.

use async_trait::async_trait;

use crate::document::{DeleteResult, Document, Filter, InsertOneResult, UpdateResult};
use crate::Result;

/// A named set of documents keyed by `_id`
#[async_trait]
pub trait Collection: Send + Sync {
    /// Insert a document, assigning an `_id` when it has none
    async fn insert_one(&self, doc: Document) -> Result<InsertOneResult>;

    /// All documents matching the filter, in insertion order
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    /// First document matching the filter
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>>;

    /// Set the given fields on the first match.
    ///
    /// With `upsert`, a missing match creates a document from the filter's
    /// equality fields overlaid with `set`.
    async fn update_one(&self, filter: &Filter, set: Document, upsert: bool)
        -> Result<UpdateResult>;

    /// Delete the first match
    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult>;
}
