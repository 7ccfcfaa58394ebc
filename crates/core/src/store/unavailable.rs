use async_trait::async_trait;

use super::Collection;
use crate::document::{DeleteResult, Document, Filter, InsertOneResult, UpdateResult};
use crate::{Error, Result};

/// Stand-in for a collection whose store could not be reached
pub struct UnavailableCollection {
    reason: String,
}

impl UnavailableCollection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> Error {
        Error::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl Collection for UnavailableCollection {
    async fn insert_one(&self, _doc: Document) -> Result<InsertOneResult> {
        Err(self.error())
    }

    async fn find(&self, _filter: &Filter) -> Result<Vec<Document>> {
        Err(self.error())
    }

    async fn find_one(&self, _filter: &Filter) -> Result<Option<Document>> {
        Err(self.error())
    }

    async fn update_one(
        &self,
        _filter: &Filter,
        _set: Document,
        _upsert: bool,
    ) -> Result<UpdateResult> {
        Err(self.error())
    }

    async fn delete_one(&self, _filter: &Filter) -> Result<DeleteResult> {
        Err(self.error())
    }
}
