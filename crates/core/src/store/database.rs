//! Database handle
//!
//! Opened once at process start and shared by every request handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Collection, FileCollection, UnavailableCollection};
use crate::{Error, Result};

pub const USERS: &str = "users";
pub const HOMES: &str = "homes";
pub const BOOKINGS: &str = "bookings";

/// Shared handle over the three collections
#[derive(Clone)]
pub struct Database {
    users: Arc<dyn Collection>,
    homes: Arc<dyn Collection>,
    bookings: Arc<dyn Collection>,
    available: bool,
}

impl Database {
    /// Open the store named by a connection string.
    ///
    /// `memory://` keeps everything in process, `file://<dir>` (or a bare
    /// directory path) persists one JSON file per collection under `<dir>`.
    pub async fn connect(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(Error::Unavailable("Empty store connection string".to_string()));
        }

        match uri.split_once("://") {
            Some(("memory", _)) => Ok(Self::in_memory()),
            Some(("file", dir)) => Self::open_dir(dir).await,
            Some((scheme, _)) => Err(Error::Unavailable(format!(
                "Unsupported store scheme '{}'",
                scheme
            ))),
            None => Self::open_dir(uri).await,
        }
    }

    /// Collections persisted as JSON files under `dir`
    pub async fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir: PathBuf = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            Error::Unavailable(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                err
            ))
        })?;

        let open = |name: &'static str| FileCollection::open(name, dir.join(format!("{}.json", name)));
        Ok(Self {
            users: Arc::new(open(USERS).await?),
            homes: Arc::new(open(HOMES).await?),
            bookings: Arc::new(open(BOOKINGS).await?),
            available: true,
        })
    }

    /// Collections that live only in memory
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(FileCollection::in_memory(USERS)),
            homes: Arc::new(FileCollection::in_memory(HOMES)),
            bookings: Arc::new(FileCollection::in_memory(BOOKINGS)),
            available: true,
        }
    }

    /// A handle whose every operation fails with [`Error::Unavailable`]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            users: Arc::new(UnavailableCollection::new(reason.clone())),
            homes: Arc::new(UnavailableCollection::new(reason.clone())),
            bookings: Arc::new(UnavailableCollection::new(reason)),
            available: false,
        }
    }

    /// Assemble a handle from arbitrary collection backends
    pub fn from_collections(
        users: Arc<dyn Collection>,
        homes: Arc<dyn Collection>,
        bookings: Arc<dyn Collection>,
    ) -> Self {
        Self {
            users,
            homes,
            bookings,
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn users(&self) -> Arc<dyn Collection> {
        Arc::clone(&self.users)
    }

    pub fn homes(&self) -> Arc<dyn Collection> {
        Arc::clone(&self.homes)
    }

    pub fn bookings(&self) -> Arc<dyn Collection> {
        Arc::clone(&self.bookings)
    }
}
