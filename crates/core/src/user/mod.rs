//! Identity module
//!
//! User profiles keyed by email, written with upsert semantics.

mod model;
mod store;

pub use model::*;
pub use store::UserStore;
