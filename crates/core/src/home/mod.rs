//! Listing module
//!
//! Property listings ("homes") owned by a host email.

mod model;
mod store;

pub use model::*;
pub use store::HomeStore;
