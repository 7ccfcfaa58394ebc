//! File-based collection implementation
//!
//! Keeps documents in memory and, when a path is configured, rewrites them as
//! a JSON array on disk after every change.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::Collection;
use crate::document::{
    assign, check_update_paths, document_id, lookup, new_id, DeleteResult, Document, Filter,
    InsertOneResult, UpdateResult, ID_FIELD,
};
use crate::{Error, Result};

/// File-backed document collection
pub struct FileCollection {
    name: String,
    /// Path to the JSON file, `None` for a purely in-memory collection
    path: Option<PathBuf>,
    /// Documents in insertion order
    docs: RwLock<Vec<Document>>,
}

impl FileCollection {
    /// Open a collection persisted at `path`
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn open(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        let path = path.into();
        let docs = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Document>>(&content)?
            }
        } else {
            Vec::new()
        };
        tracing::debug!(collection = %name, count = docs.len(), "Loaded collection");

        Ok(Self {
            name,
            path: Some(path),
            docs: RwLock::new(docs),
        })
    }

    /// A collection that lives only as long as the process
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            docs: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persist `next` and only then make it the visible state. Called with
    /// the write lock held so concurrent writers cannot interleave file
    /// contents.
    async fn commit(&self, docs: &mut Vec<Document>, next: Vec<Document>) -> Result<()> {
        self.persist(&next).await?;
        *docs = next;
        Ok(())
    }

    async fn persist(&self, docs: &[Document]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(docs)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// `_id` is assigned by the store and never changed by an update
fn strip_id(mut set: Document) -> Document {
    set.remove(ID_FIELD);
    set
}

#[async_trait]
impl Collection for FileCollection {
    async fn insert_one(&self, mut doc: Document) -> Result<InsertOneResult> {
        let mut docs = self.docs.write().await;
        let id = match doc.get(ID_FIELD) {
            None => {
                let id = new_id();
                doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
            Some(Value::String(id)) => {
                if docs.iter().any(|existing| document_id(existing) == Some(id.as_str())) {
                    return Err(Error::InvalidInput(format!(
                        "Document with ID {} already exists in {}",
                        id, self.name
                    )));
                }
                id.clone()
            }
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "Document ID must be a string, got {}",
                    other
                )))
            }
        };
        let mut next = docs.clone();
        next.push(doc);
        self.commit(&mut docs, next).await?;
        Ok(InsertOneResult::new(id))
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|doc| filter.matches(doc)).cloned())
    }

    async fn update_one(
        &self,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        check_update_paths(&set)?;
        let set = strip_id(set);
        let mut docs = self.docs.write().await;

        let (next, result) = if let Some(index) = docs.iter().position(|doc| filter.matches(doc)) {
            let mut doc = docs[index].clone();
            let mut modified = false;
            for (path, value) in set {
                if lookup(&doc, &path) != Some(&value) {
                    assign(&mut doc, &path, value);
                    modified = true;
                }
            }
            if !modified {
                return Ok(UpdateResult::matched(false));
            }
            let mut next = docs.clone();
            next[index] = doc;
            (next, UpdateResult::matched(true))
        } else if upsert {
            let mut doc = Document::new();
            for (path, value) in filter.clauses() {
                assign(&mut doc, path, value.clone());
            }
            for (path, value) in set {
                assign(&mut doc, &path, value);
            }
            let id = match document_id(&doc) {
                Some(id) => id.to_string(),
                None => {
                    let id = new_id();
                    doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                    id
                }
            };
            let mut next = docs.clone();
            next.push(doc);
            (next, UpdateResult::upserted(id))
        } else {
            return Ok(UpdateResult::unmatched());
        };

        self.commit(&mut docs, next).await?;
        Ok(result)
    }

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult> {
        let mut docs = self.docs.write().await;
        let Some(index) = docs.iter().position(|doc| filter.matches(doc)) else {
            return Ok(DeleteResult::new(0));
        };
        let mut next = docs.clone();
        next.remove(index);
        self.commit(&mut docs, next).await?;
        Ok(DeleteResult::new(1))
    }
}
