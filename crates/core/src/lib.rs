//! Core library for the HomeScape booking backend
//!
//! This crate contains the persistence side of the service, including:
//! - Semi-structured documents and equality filters
//! - Document collections (file-backed, in-memory, unavailable)
//! - Identity, listing and booking stores

pub mod booking;
pub mod document;
pub mod error;
pub mod home;
pub mod store;
pub mod user;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
