//! Store module
//!
//! Collections of documents and the process-wide database handle that owns them.

mod collection;
mod database;
mod file_store;
mod unavailable;

pub use collection::Collection;
pub use database::{Database, BOOKINGS, HOMES, USERS};
pub use file_store::FileCollection;
pub use unavailable::UnavailableCollection;
